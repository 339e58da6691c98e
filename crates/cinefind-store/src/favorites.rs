//! Favorites list kept in memory and written through to a key-value store.

use std::collections::HashSet;

use anyhow::{Context, Result};
use cinefind_api::omdb::MovieSummary;

use super::kv::KeyValueStore;

/// Storage key holding the JSON-encoded favorites array.
pub const FAVORITES_KEY: &str = "movieapp_favorites";

/// Favorited titles, unique by IMDb ID, in insertion order.
///
/// Every mutation rewrites the whole list under [`FAVORITES_KEY`] before
/// returning, so the in-memory list and the stored one never diverge. A
/// failed write rolls the in-memory change back.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    backend: S,
    movies: Vec<MovieSummary>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Reads the stored list once.
    ///
    /// Missing, unreadable or malformed data yields an empty list; the
    /// problem is logged and never returned to the caller.
    pub fn load(backend: S) -> Self {
        let movies = match backend.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<MovieSummary>>(&raw) {
                Ok(list) => unique_by_id(list),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored favorites are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    error = format!("{e:#}"),
                    "Failed to read stored favorites, starting empty"
                );
                Vec::new()
            }
        };

        tracing::debug!(count = movies.len(), "Favorites loaded");
        Self { backend, movies }
    }

    /// Appends a movie unless its ID is already present.
    ///
    /// Returns `true` if the list changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted; the list is left unchanged.
    pub fn add(&mut self, movie: MovieSummary) -> Result<bool> {
        if self.contains(&movie.imdb_id) {
            return Ok(false);
        }

        self.movies.push(movie);
        if let Err(e) = self.persist() {
            self.movies.pop();
            return Err(e);
        }
        Ok(true)
    }

    /// Removes the movie with the given ID, if present.
    ///
    /// Returns `true` if the list changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted; the list is left unchanged.
    pub fn remove(&mut self, imdb_id: &str) -> Result<bool> {
        let Some(pos) = self.movies.iter().position(|m| m.imdb_id == imdb_id) else {
            return Ok(false);
        };

        let removed = self.movies.remove(pos);
        if let Err(e) = self.persist() {
            self.movies.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Removes the movie if present, adds it otherwise.
    ///
    /// Returns whether the movie is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be persisted; the list is left unchanged.
    pub fn toggle(&mut self, movie: &MovieSummary) -> Result<bool> {
        if self.contains(&movie.imdb_id) {
            self.remove(&movie.imdb_id)?;
            Ok(false)
        } else {
            self.add(movie.clone())?;
            Ok(true)
        }
    }

    /// Whether a movie with this ID is a favorite.
    #[must_use]
    pub fn contains(&self, imdb_id: &str) -> bool {
        self.movies.iter().any(|m| m.imdb_id == imdb_id)
    }

    /// Favorites in insertion order.
    #[must_use]
    pub fn list(&self) -> &[MovieSummary] {
        &self.movies
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Underlying storage backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Rewrites the full list under the favorites key.
    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.movies).context("failed to encode favorites")?;
        self.backend
            .set(FAVORITES_KEY, &json)
            .context("failed to persist favorites")
    }
}

/// Keeps the first occurrence of each IMDb ID.
fn unique_by_id(movies: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    movies
        .into_iter()
        .filter(|m| seen.insert(m.imdb_id.clone()))
        .collect()
}
