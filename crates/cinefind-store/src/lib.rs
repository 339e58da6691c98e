//! Local persistence for cinefind.
//!
//! Uses `rusqlite` (bundled `SQLite`) as a small key-value store and keeps
//! the favorites list under a single key as a JSON array.

mod connection;
/// Favorites list with write-through persistence.
pub mod favorites;
/// Key-value storage backends.
pub mod kv;
mod migrations;

#[allow(clippy::module_name_repetitions)]
pub use connection::{DB_FILE_NAME, open_db};
pub use favorites::{FAVORITES_KEY, FavoritesStore};
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
