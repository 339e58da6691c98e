//! OMDb API client module.
//!
//! Handles the three read-only lookups the OMDb endpoint offers:
//! title search, details by IMDb ID and details by exact title.

mod api;
mod client;
mod sentinel;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use sentinel::NOT_AVAILABLE;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DetailsResult, MediaType, MovieDetails, MovieSummary, OmdbResponse, PAGE_SIZE, SearchPage,
    SearchParams, SearchResult, parse_total_results, total_pages,
};
