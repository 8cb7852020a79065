//! Snapshot restoration
//!
//! Replaces the working entry journal and pay settings with the contents
//! of a snapshot.

use chrono::NaiveDate;

use crate::config::preferences::PreferenceStore;
use crate::error::TidrapportResult;
use crate::models::{PaySettings, TimeEntry};
use crate::storage::serializer::SnapshotSerializer;
use crate::storage::Storage;

use super::lifecycle::BackupLifecycleManager;

/// What a snapshot contains, read without restoring it
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub file_name: String,
    pub entry_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub pay: PaySettings,
}

impl ValidationResult {
    fn from_contents(file_name: &str, entries: &[TimeEntry], pay: PaySettings) -> Self {
        Self {
            file_name: file_name.to_string(),
            entry_count: entries.len(),
            first_date: entries.iter().map(|e| e.date).min(),
            last_date: entries.iter().map(|e| e.date).max(),
            pay,
        }
    }

    pub fn summary(&self) -> String {
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!(
                "{} entries from {} to {}",
                self.entry_count, first, last
            ),
            _ => "No entries".to_string(),
        }
    }
}

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub file_name: String,
    /// Entries in the journal before the restore
    pub entries_replaced: usize,
    /// Entries in the journal after the restore
    pub entries_restored: usize,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        format!(
            "Restored {} entries from {} (replaced {})",
            self.entries_restored, self.file_name, self.entries_replaced
        )
    }
}

/// Read a snapshot and describe its contents
pub fn validate_snapshot<P, S>(
    manager: &BackupLifecycleManager<P, S>,
    file_name: &str,
) -> TidrapportResult<ValidationResult>
where
    P: PreferenceStore,
    S: SnapshotSerializer,
{
    let (entries, pay) = manager.load_backup(file_name)?;
    Ok(ValidationResult::from_contents(file_name, &entries, pay))
}

/// Replace the journal and pay settings with a snapshot's contents
///
/// Nothing on disk changes if the snapshot cannot be read.
pub fn restore_snapshot<P, S>(
    manager: &BackupLifecycleManager<P, S>,
    storage: &mut Storage,
    file_name: &str,
) -> TidrapportResult<RestoreResult>
where
    P: PreferenceStore,
    S: SnapshotSerializer,
{
    let (entries, pay) = manager.load_backup(file_name)?;
    apply_snapshot(storage, file_name, entries, pay)
}

/// Replace the journal and pay settings with already loaded snapshot contents
///
/// Lets a caller read the snapshot, take a safety backup (whose cleanup may
/// evict the original file), and then restore.
pub fn apply_snapshot(
    storage: &mut Storage,
    file_name: &str,
    entries: Vec<TimeEntry>,
    pay: PaySettings,
) -> TidrapportResult<RestoreResult> {
    let entries_replaced = storage.entries.count()?;
    storage.entries.replace_all(entries)?;
    storage.settings.pay = pay;
    storage.save_all()?;

    Ok(RestoreResult {
        file_name: file_name.to_string(),
        entries_replaced,
        entries_restored: storage.entries.count()?,
    })
}
