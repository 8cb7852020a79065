//! Configuration module for Tidrapport
//!
//! - Platform path resolution
//! - Persisted user settings (pay rules)
//! - Typed preference store for backup policy

pub mod paths;
pub mod preferences;
pub mod settings;

pub use paths::TidrapportPaths;
pub use preferences::{BackupSettings, JsonPreferences, MemoryPreferences, PreferenceStore};
pub use settings::Settings;
