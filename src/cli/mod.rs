//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the storage and backup layers.

pub mod backup;
pub mod entry;
pub mod export;

pub use backup::{handle_backup_command, BackupCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use export::{handle_export_command, ExportFormat};

use crate::backup::BackupLifecycleManager;
use crate::config::preferences::JsonPreferences;
use crate::storage::Storage;

/// The backup manager for this installation, using the on-disk preferences
pub fn backup_manager(storage: &Storage) -> BackupLifecycleManager<JsonPreferences> {
    BackupLifecycleManager::new(
        storage.snapshot_store(),
        JsonPreferences::new(storage.paths().preferences_file()),
    )
}
