//! `OmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{DetailsResult, SearchParams, SearchResult};

/// OMDb API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// An `Err` always means the request could not complete (transport error,
/// non-2xx status, undecodable body). A vendor-side `"Response": "False"`
/// comes back as `Ok(OmdbResponse::Failure { .. })`.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OmdbApi: Send)]
pub trait LocalOmdbApi {
    /// Searches titles by free-text query, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movies(&self, params: &SearchParams) -> Result<SearchResult>;

    /// Fetches full-plot details for an IMDb ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, imdb_id: &str) -> Result<DetailsResult>;

    /// Fetches full-plot details for an exact title, optionally narrowed by year.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_by_title(&self, title: &str, year: Option<&str>) -> Result<DetailsResult>;
}
