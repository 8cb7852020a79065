//! Storage layer for Tidrapport
//!
//! JSON file storage with atomic writes: the working entry journal and the
//! snapshot store that backs the backup system.

pub mod entries;
pub mod file_io;
pub mod serializer;
pub mod snapshots;

pub use entries::EntryRepository;
pub use file_io::{read_json, write_json_atomic, write_text_atomic};
pub use serializer::{JsonSnapshotSerializer, SnapshotDocument, SnapshotSerializer};
pub use snapshots::{
    parse_snapshot_timestamp, SnapshotMetadata, SnapshotOrigin, SnapshotStore,
    AUTO_BACKUP_PREFIX, MANUAL_BACKUP_PREFIX, REPORT_PREFIX,
};

use crate::config::paths::TidrapportPaths;
use crate::config::settings::Settings;
use crate::error::TidrapportError;

/// Main storage coordinator: paths, settings and the entry journal
pub struct Storage {
    paths: TidrapportPaths,
    pub settings: Settings,
    pub entries: EntryRepository,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: TidrapportPaths) -> Result<Self, TidrapportError> {
        paths.ensure_directories()?;

        Ok(Self {
            settings: Settings::load_or_create(&paths)?,
            entries: EntryRepository::new(paths.entries_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &TidrapportPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TidrapportError> {
        self.settings = Settings::load_or_create(&self.paths)?;
        self.entries.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TidrapportError> {
        self.settings.save(&self.paths)?;
        self.entries.save()
    }

    /// A snapshot store over this installation's backup directory
    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.paths.backup_dir())
    }
}
