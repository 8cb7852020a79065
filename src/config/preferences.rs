//! Typed key-value preference store
//!
//! Backup policy and the last automatic backup time live here rather than
//! in [`Settings`](super::settings::Settings): they are read fresh before
//! every scheduling decision, so an edit takes effect on the very next
//! call. Missing or unreadable values fall back to documented defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{TidrapportError, TidrapportResult};
use crate::storage::file_io::{read_json, write_json_atomic};

pub const AUTO_BACKUP_ENABLED: &str = "auto_backup_enabled";
pub const BACKUP_INTERVAL_HOURS: &str = "backup_interval_hours";
pub const MAX_BACKUPS: &str = "max_backups";
pub const BACKUP_ON_CHANGES: &str = "backup_on_changes";
pub const LAST_AUTO_BACKUP: &str = "last_auto_backup";

/// A single stored preference value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
    Timestamp(DateTime<Utc>),
}

/// Durable key-value store with typed accessors
///
/// Getters return `None` when a key is absent or holds a value of another
/// type; callers supply the default.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<PreferenceValue>;

    fn set(&self, key: &str, value: PreferenceValue) -> TidrapportResult<()>;

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            PreferenceValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            PreferenceValue::Int(value) => Some(value),
            _ => None,
        }
    }

    fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            PreferenceValue::Timestamp(value) => Some(value),
            _ => None,
        }
    }

    fn set_bool(&self, key: &str, value: bool) -> TidrapportResult<()> {
        self.set(key, PreferenceValue::Bool(value))
    }

    fn set_int(&self, key: &str, value: i64) -> TidrapportResult<()> {
        self.set(key, PreferenceValue::Int(value))
    }

    fn set_timestamp(&self, key: &str, value: DateTime<Utc>) -> TidrapportResult<()> {
        self.set(key, PreferenceValue::Timestamp(value))
    }
}

/// Backup scheduling and retention policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSettings {
    pub auto_backup_enabled: bool,
    /// Minimum whole hours between automatic backups
    pub interval_hours: u32,
    /// Number of most recent snapshots kept by cleanup
    pub max_backups: u32,
    /// Whether edits to entries should trigger a due automatic backup
    pub backup_on_changes: bool,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            auto_backup_enabled: false,
            interval_hours: 24,
            max_backups: 10,
            backup_on_changes: true,
        }
    }
}

impl BackupSettings {
    /// Read the whole policy from a store, key by key
    pub fn load<P: PreferenceStore + ?Sized>(store: &P) -> Self {
        let defaults = Self::default();
        Self {
            auto_backup_enabled: store
                .get_bool(AUTO_BACKUP_ENABLED)
                .unwrap_or(defaults.auto_backup_enabled),
            interval_hours: read_u32(store, BACKUP_INTERVAL_HOURS, 0, defaults.interval_hours),
            max_backups: read_u32(store, MAX_BACKUPS, 1, defaults.max_backups),
            backup_on_changes: store
                .get_bool(BACKUP_ON_CHANGES)
                .unwrap_or(defaults.backup_on_changes),
        }
    }

    /// Write the whole policy to a store
    pub fn save<P: PreferenceStore + ?Sized>(&self, store: &P) -> TidrapportResult<()> {
        store.set_bool(AUTO_BACKUP_ENABLED, self.auto_backup_enabled)?;
        store.set_int(BACKUP_INTERVAL_HOURS, i64::from(self.interval_hours))?;
        store.set_int(MAX_BACKUPS, i64::from(self.max_backups))?;
        store.set_bool(BACKUP_ON_CHANGES, self.backup_on_changes)?;
        Ok(())
    }
}

/// Stored integer if it fits in `u32` and is at least `min`, else `default`
fn read_u32<P: PreferenceStore + ?Sized>(store: &P, key: &str, min: u32, default: u32) -> u32 {
    store
        .get_int(key)
        .and_then(|value| u32::try_from(value).ok())
        .filter(|&value| value >= min)
        .unwrap_or(default)
}

/// Preferences persisted as a JSON object in a single file
///
/// The file is re-read on every lookup and rewritten atomically on every
/// update.
#[derive(Debug, Clone)]
pub struct JsonPreferences {
    path: PathBuf,
}

impl JsonPreferences {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_map(&self) -> TidrapportResult<BTreeMap<String, PreferenceValue>> {
        read_json(&self.path)
    }
}

impl PreferenceStore for JsonPreferences {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        match self.load_map() {
            Ok(mut map) => map.remove(key),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "preferences unreadable, using default");
                None
            }
        }
    }

    fn set(&self, key: &str, value: PreferenceValue) -> TidrapportResult<()> {
        let mut map = self.load_map().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "replacing unreadable preferences file");
            BTreeMap::new()
        });
        map.insert(key.to_string(), value);
        write_json_atomic(&self.path, &map)
    }
}

/// In-memory preferences, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<BTreeMap<String, PreferenceValue>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        let values = self.values.read().ok()?;
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: PreferenceValue) -> TidrapportResult<()> {
        let mut values = self.values.write().map_err(|e| {
            TidrapportError::Config(format!("Failed to acquire write lock: {}", e))
        })?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryPreferences::new();
        let settings = BackupSettings::load(&store);

        assert!(!settings.auto_backup_enabled);
        assert_eq!(settings.interval_hours, 24);
        assert_eq!(settings.max_backups, 10);
        assert!(settings.backup_on_changes);
    }

    #[test]
    fn test_backup_settings_round_trip() {
        let store = MemoryPreferences::new();
        let settings = BackupSettings {
            auto_backup_enabled: true,
            interval_hours: 6,
            max_backups: 3,
            backup_on_changes: false,
        };

        settings.save(&store).unwrap();
        assert_eq!(BackupSettings::load(&store), settings);
    }

    #[test]
    fn test_type_mismatch_reads_as_absent() {
        let store = MemoryPreferences::new();
        store.set_int(AUTO_BACKUP_ENABLED, 1).unwrap();

        assert_eq!(store.get_bool(AUTO_BACKUP_ENABLED), None);
        assert!(!BackupSettings::load(&store).auto_backup_enabled);
    }

    #[test]
    fn test_negative_interval_falls_back_to_default() {
        let store = MemoryPreferences::new();
        store.set_int(BACKUP_INTERVAL_HOURS, -5).unwrap();

        assert_eq!(BackupSettings::load(&store).interval_hours, 24);
    }

    #[test]
    fn test_zero_max_backups_falls_back_to_default() {
        let store = MemoryPreferences::new();
        store.set_int(MAX_BACKUPS, 0).unwrap();
        store.set_int(BACKUP_INTERVAL_HOURS, 0).unwrap();

        let settings = BackupSettings::load(&store);
        assert_eq!(settings.max_backups, 10);
        assert_eq!(settings.interval_hours, 0);
    }

    #[test]
    fn test_json_preferences_persist_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        let when = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap();

        let store = JsonPreferences::new(path.clone());
        store.set_bool(AUTO_BACKUP_ENABLED, true).unwrap();
        store.set_int(MAX_BACKUPS, 4).unwrap();
        store.set_timestamp(LAST_AUTO_BACKUP, when).unwrap();

        let reopened = JsonPreferences::new(path);
        assert_eq!(reopened.get_bool(AUTO_BACKUP_ENABLED), Some(true));
        assert_eq!(reopened.get_int(MAX_BACKUPS), Some(4));
        assert_eq!(reopened.get_timestamp(LAST_AUTO_BACKUP), Some(when));
    }

    #[test]
    fn test_corrupt_preferences_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = JsonPreferences::new(path);
        assert_eq!(BackupSettings::load(&store), BackupSettings::default());

        store.set_bool(AUTO_BACKUP_ENABLED, true).unwrap();
        assert_eq!(store.get_bool(AUTO_BACKUP_ENABLED), Some(true));
    }
}
