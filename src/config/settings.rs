//! User settings for Tidrapport
//!
//! Persisted in `config.json`. The pay rules stored here are the ones
//! serialized into every snapshot; backup policy lives in the preference
//! store instead (see [`crate::config::preferences`]).

use serde::{Deserialize, Serialize};

use super::paths::TidrapportPaths;
use crate::error::TidrapportError;
use crate::models::PaySettings;
use crate::storage::file_io::{read_json, write_json_atomic};

/// User settings for Tidrapport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Pay rules used to compute entry pay
    #[serde(default)]
    pub pay: PaySettings,

    /// Date format used in terminal output (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pay: PaySettings::default(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &TidrapportPaths) -> Result<Self, TidrapportError> {
        read_json(paths.settings_file()).map_err(|e| match e {
            TidrapportError::CorruptData(msg) => {
                TidrapportError::Config(format!("Failed to parse settings file: {}", msg))
            }
            other => other,
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TidrapportPaths) -> Result<(), TidrapportError> {
        write_json_atomic(paths.settings_file(), self)
    }
}
