//! Application configuration module.
//!
//! Manages the TOML config file holding the OMDb API key and endpoint.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig};
