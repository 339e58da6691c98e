//! Where cinefind keeps its files.
//!
//! `--dir` puts the config, the database and the TUI log in one directory.
//! Without it, config goes to `~/.config/cinefind` and data to
//! `~/.local/share/cinefind`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cinefind_store::DB_FILE_NAME;

/// Subdirectory name under the per-user config and data roots.
const APP_DIR_NAME: &str = "cinefind";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// TUI log file name inside the data directory.
const LOG_FILE_NAME: &str = "cinefind.log";

/// Resolved config and data directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppDirs {
    /// Resolves the directories once from `--dir` or `HOME`.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is `None` and `HOME` is not set.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir {
            return Ok(Self::single(dir));
        }
        let home = std::env::var_os("HOME").context("HOME environment variable is not set")?;
        Ok(Self::under_home(Path::new(&home)))
    }

    /// Config and data share `dir`.
    #[must_use]
    pub fn single(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    /// Per-user layout below `home`.
    #[must_use]
    pub fn under_home(home: &Path) -> Self {
        Self {
            config_dir: home.join(".config").join(APP_DIR_NAME),
            data_dir: home.join(".local").join("share").join(APP_DIR_NAME),
        }
    }

    /// Path of `config.toml`.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Directory holding the database and the log.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the favorites database.
    #[must_use]
    pub fn db_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Path of the TUI log file.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
