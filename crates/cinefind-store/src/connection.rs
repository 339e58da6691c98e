//! `SQLite` file handling for the favorites database.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "cinefind.db";

/// Opens `{data_dir}/cinefind.db`, creating the directory and schema on first use.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the file cannot be
/// opened, or migrations fail.
pub fn open_db(data_dir: &Path) -> Result<Connection> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let db_path = data_dir.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    run_migrations(&conn).context("database migration failed")?;

    tracing::debug!(path = %db_path.display(), "Database opened");
    Ok(conn)
}
