//! API client library for cinefind.
//!
//! Provides a client for the OMDb movie-metadata API.

/// OMDb API client.
pub mod omdb;
