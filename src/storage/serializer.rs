//! Snapshot serialization
//!
//! Converts a list of time entries plus pay settings into the textual
//! snapshot document and back. The same document is used for JSON and
//! YAML exports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TidrapportError, TidrapportResult};
use crate::models::{PaySettings, TimeEntry};

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Converts `(entries, settings)` to text and back
///
/// Implementations must round-trip: deserializing the output of
/// `serialize` yields the same entries and settings.
pub trait SnapshotSerializer {
    /// File extension (without the dot) for snapshots in this format
    fn extension(&self) -> &'static str;

    fn serialize(&self, entries: &[TimeEntry], settings: &PaySettings) -> TidrapportResult<String>;

    fn deserialize(&self, text: &str) -> TidrapportResult<(Vec<TimeEntry>, PaySettings)>;
}

/// On-disk snapshot document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Schema version for migration support
    pub schema_version: u32,

    /// When the document was produced
    pub created_at: DateTime<Utc>,

    /// Application version that wrote the document
    pub app_version: String,

    pub settings: PaySettings,

    pub entries: Vec<TimeEntry>,
}

impl SnapshotDocument {
    pub fn new(entries: &[TimeEntry], settings: &PaySettings) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            created_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            settings: settings.clone(),
            entries: entries.to_vec(),
        }
    }

    /// Check the document can be read by this version
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(format!(
                "Snapshot schema version {} is newer than supported version {}",
                self.schema_version, SNAPSHOT_SCHEMA_VERSION
            ));
        }
        Ok(())
    }
}

/// Pretty-printed JSON snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotSerializer;

impl SnapshotSerializer for JsonSnapshotSerializer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, entries: &[TimeEntry], settings: &PaySettings) -> TidrapportResult<String> {
        let document = SnapshotDocument::new(entries, settings);
        serde_json::to_string_pretty(&document)
            .map_err(|e| TidrapportError::Serialization(format!("Failed to serialize snapshot: {}", e)))
    }

    fn deserialize(&self, text: &str) -> TidrapportResult<(Vec<TimeEntry>, PaySettings)> {
        let document: SnapshotDocument = serde_json::from_str(text)
            .map_err(|e| TidrapportError::CorruptData(format!("Failed to parse snapshot: {}", e)))?;

        document.validate().map_err(TidrapportError::CorruptData)?;

        Ok((document.entries, document.settings))
    }
}
