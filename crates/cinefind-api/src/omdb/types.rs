//! OMDb API response types and search parameters.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Number of results OMDb returns per search page.
pub const PAGE_SIZE: u64 = 10;

/// Base URL for IMDb title pages.
const IMDB_TITLE_URL: &str = "https://www.imdb.com/title/";

// --- Media type ---

/// Kind of title reported in the `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film.
    #[default]
    Movie,
    /// TV series.
    Series,
    /// Single episode of a series.
    Episode,
    /// Video game.
    Game,
    /// Anything OMDb adds later.
    #[serde(other)]
    Other,
}

impl MediaType {
    /// Value used for the `type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Summary ---

/// A single search hit, also the record kept in the favorites list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// IMDb ID (e.g. `tt0133093`).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year as reported (may be a range such as `2008–2013`).
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Media type.
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
    /// Poster URL.
    #[serde(
        rename = "Poster",
        default,
        with = "crate::omdb::sentinel"
    )]
    pub poster: Option<String>,
}

impl MovieSummary {
    /// IMDb page for this title.
    #[must_use]
    pub fn imdb_url(&self) -> String {
        format!("{IMDB_TITLE_URL}{}/", self.imdb_id)
    }
}

// --- Search ---

/// Successful payload of a title search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchPage {
    /// Hits on this page.
    #[serde(rename = "Search", default)]
    pub movies: Vec<MovieSummary>,
    /// Total hit count across all pages, as the raw vendor string.
    #[serde(rename = "totalResults", default)]
    pub total_results: String,
}

impl SearchPage {
    /// Parsed total hit count (`0` when the vendor value is not a number).
    #[must_use]
    pub fn total_results_count(&self) -> u64 {
        parse_total_results(&self.total_results)
    }

    /// Number of pages implied by the vendor's total hit count.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_results_count())
    }

    /// Drops repeated IMDb IDs, keeping the first occurrence.
    pub(crate) fn retain_unique(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.movies.retain(|m| seen.insert(m.imdb_id.clone()));
    }
}

/// Parses the vendor's `totalResults` string.
///
/// Non-numeric or negative input is treated as zero results.
#[must_use]
pub fn parse_total_results(raw: &str) -> u64 {
    raw.trim().parse::<u64>().unwrap_or(0)
}

/// Number of result pages for a hit count: `ceil(total / PAGE_SIZE)`.
#[must_use]
pub fn total_pages(total_results: u64) -> u32 {
    u32::try_from(total_results.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX)
}

// --- Details ---

/// Full record returned by the `i=` and `t=` lookups.
///
/// Every optional field is `None` when OMDb sent `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieDetails {
    /// IMDb ID.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Media type.
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
    /// Poster URL.
    #[serde(
        rename = "Poster",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub poster: Option<String>,
    /// Rating classification (e.g. `R`).
    #[serde(
        rename = "Rated",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub rated: Option<String>,
    /// Release date.
    #[serde(
        rename = "Released",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub released: Option<String>,
    /// Runtime (e.g. `136 min`).
    #[serde(
        rename = "Runtime",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub runtime: Option<String>,
    /// Comma-joined genre list.
    #[serde(
        rename = "Genre",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub genre: Option<String>,
    /// Director(s).
    #[serde(
        rename = "Director",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub director: Option<String>,
    /// Writer(s).
    #[serde(
        rename = "Writer",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub writer: Option<String>,
    /// Cast.
    #[serde(
        rename = "Actors",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub actors: Option<String>,
    /// Plot text.
    #[serde(
        rename = "Plot",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub plot: Option<String>,
    /// Spoken languages.
    #[serde(
        rename = "Language",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub language: Option<String>,
    /// Production countries.
    #[serde(
        rename = "Country",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub country: Option<String>,
    /// Awards summary.
    #[serde(
        rename = "Awards",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub awards: Option<String>,
    /// Metascore.
    #[serde(
        rename = "Metascore",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub metascore: Option<String>,
    /// IMDb rating as text (e.g. `8.7`).
    #[serde(
        rename = "imdbRating",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub imdb_rating: Option<String>,
    /// IMDb vote count as text (e.g. `2,134,567`).
    #[serde(
        rename = "imdbVotes",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub imdb_votes: Option<String>,
    /// Box office gross.
    #[serde(
        rename = "BoxOffice",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub box_office: Option<String>,
    /// Production company.
    #[serde(
        rename = "Production",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub production: Option<String>,
    /// Official website.
    #[serde(
        rename = "Website",
        default,
        deserialize_with = "crate::omdb::sentinel::deserialize"
    )]
    pub website: Option<String>,
}

impl MovieDetails {
    /// Projects the details down to the summary record.
    #[must_use]
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            imdb_id: self.imdb_id.clone(),
            title: self.title.clone(),
            year: self.year.clone(),
            media_type: self.media_type,
            poster: self.poster.clone(),
        }
    }

    /// IMDb rating, when it is a number.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.imdb_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
    }

    /// IMDb vote count, ignoring thousands separators.
    #[must_use]
    pub fn votes(&self) -> Option<u64> {
        self.imdb_votes
            .as_deref()
            .and_then(|v| v.replace(',', "").trim().parse::<u64>().ok())
    }

    /// Genre list split on commas.
    #[must_use]
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .as_deref()
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// --- Envelope ---

/// Discriminated OMDb answer.
///
/// OMDb always replies with a `Response` field of `"True"` or `"False"`;
/// on `"False"` an `Error` string usually explains why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmdbResponse<T> {
    /// `"Response": "True"` with the decoded payload.
    Success(T),
    /// `"Response": "False"`.
    Failure {
        /// Vendor error text, if any.
        error: Option<String>,
    },
}

/// Result of a title search.
pub type SearchResult = OmdbResponse<SearchPage>;

/// Result of a details lookup.
pub type DetailsResult = OmdbResponse<MovieDetails>;

/// Fields common to every OMDb reply.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl<T: DeserializeOwned> OmdbResponse<T> {
    /// Decodes an OMDb JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON, or reports success but the
    /// payload does not match `T`.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(body).context("response body is not valid JSON")?;
        let envelope =
            Envelope::deserialize(&value).context("response has no OMDb envelope")?;

        if envelope.response.eq_ignore_ascii_case("true") {
            let payload = T::deserialize(value).context("failed to decode OMDb payload")?;
            return Ok(Self::Success(payload));
        }

        Ok(Self::Failure {
            error: envelope.error.filter(|e| !e.trim().is_empty()),
        })
    }
}

impl<T> OmdbResponse<T> {
    /// Whether OMDb reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Vendor error text on failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => error.as_deref(),
        }
    }

    /// Payload on success.
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure { .. } => None,
        }
    }
}

// --- Search Parameters ---

/// Parameters for a title search (`s=`).
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-based, default: 1).
    pub page: u32,
    /// Restrict hits to one media type (default: movie).
    pub media_type: MediaType,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            media_type: MediaType::Movie,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the media type filter.
    #[must_use]
    pub const fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }
}
