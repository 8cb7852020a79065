//! Path management for Tidrapport
//!
//! ## Path Resolution Order
//!
//! 1. `TIDRAPPORT_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory from `directories`
//!    (`~/.config/tidrapport` on Linux, `~/Library/Application Support/...`
//!    on macOS, `%APPDATA%\...` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::TidrapportError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TIDRAPPORT_DATA_DIR";

/// Manages all paths used by Tidrapport
#[derive(Debug, Clone)]
pub struct TidrapportPaths {
    base_dir: PathBuf,
}

impl TidrapportPaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TidrapportError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the working entry journal
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Storage area for snapshot files
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Persisted application settings
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Key-value preference store (backup policy, last auto-backup time)
    pub fn preferences_file(&self) -> PathBuf {
        self.base_dir.join("preferences.json")
    }

    /// Working set of time entries
    pub fn entries_file(&self) -> PathBuf {
        self.data_dir().join("entries.json")
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), TidrapportError> {
        for dir in [self.base_dir.clone(), self.data_dir(), self.backup_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                TidrapportError::Io(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, TidrapportError> {
    ProjectDirs::from("se", "tidrapport", "tidrapport")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| TidrapportError::Config("Could not determine home directory".into()))
}
