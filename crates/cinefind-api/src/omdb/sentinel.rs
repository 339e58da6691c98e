//! Serde glue for the OMDb `"N/A"` marker.
//!
//! OMDb fills every field it has no data for with the literal `"N/A"`.
//! Fields using this module decode that marker (and blank strings) to `None`
//! and encode `None` back to the marker, so stored records keep the vendor shape.

use serde::{Deserialize, Deserializer, Serializer};

/// Literal OMDb uses for "no data".
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns `None` for the sentinel or blank text.
pub(crate) fn normalize(raw: Option<String>) -> Option<String> {
    raw.filter(|v| {
        let trimmed = v.trim();
        !trimmed.is_empty() && trimmed != NOT_AVAILABLE
    })
}

pub(crate) fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize(raw))
}
