//! Backup lifecycle manager
//!
//! Policy layer over [`SnapshotStore`]: decides when an automatic backup is
//! due, creates snapshots, and keeps only the newest `max_backups` of them.
//! The backup policy is read from the preference store on every call.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::preferences::{BackupSettings, PreferenceStore, LAST_AUTO_BACKUP};
use crate::error::{TidrapportError, TidrapportResult};
use crate::models::{PaySettings, TimeEntry};
use crate::storage::serializer::{JsonSnapshotSerializer, SnapshotSerializer};
use crate::storage::snapshots::{
    parse_snapshot_timestamp, SnapshotMetadata, SnapshotOrigin, SnapshotStore,
};

/// Creates snapshots and enforces the retention policy
pub struct BackupLifecycleManager<P, S = JsonSnapshotSerializer>
where
    P: PreferenceStore,
    S: SnapshotSerializer,
{
    store: SnapshotStore<S>,
    preferences: P,
}

impl<P, S> BackupLifecycleManager<P, S>
where
    P: PreferenceStore,
    S: SnapshotSerializer,
{
    pub fn new(store: SnapshotStore<S>, preferences: P) -> Self {
        Self { store, preferences }
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    /// Write a snapshot, then run cleanup
    ///
    /// An automatic backup also records the current time as the last
    /// automatic backup. If the write fails nothing else happens.
    pub fn create_backup(
        &self,
        entries: &[TimeEntry],
        settings: &PaySettings,
        automatic: bool,
        description: Option<String>,
    ) -> TidrapportResult<SnapshotMetadata> {
        let origin = if automatic {
            SnapshotOrigin::Automatic
        } else {
            SnapshotOrigin::Manual
        };

        let file_name = self
            .store
            .write(entries, settings, origin)
            .map_err(TidrapportError::backup)?;

        if automatic {
            if let Err(e) = self.preferences.set_timestamp(LAST_AUTO_BACKUP, Utc::now()) {
                warn!(error = %e, "snapshot written but last auto-backup time not recorded");
            }
        }

        self.cleanup();

        Ok(SnapshotMetadata {
            created_at: parse_snapshot_timestamp(&file_name).unwrap_or_else(Utc::now),
            file_name,
            entry_count: entries.len(),
            origin,
            description,
        })
    }

    /// Whether an automatic backup is due; has no side effects
    pub fn should_create_auto_backup(&self) -> bool {
        let policy = self.backup_settings();
        if !policy.auto_backup_enabled {
            return false;
        }

        let last = self.last_auto_backup().unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let elapsed_hours = Utc::now().signed_duration_since(last).num_hours();
        debug!(elapsed_hours, interval = policy.interval_hours, "auto-backup check");

        elapsed_hours >= i64::from(policy.interval_hours)
    }

    /// Create an automatic backup if one is due
    pub fn maybe_create_auto_backup(
        &self,
        entries: &[TimeEntry],
        settings: &PaySettings,
    ) -> TidrapportResult<Option<SnapshotMetadata>> {
        if !self.should_create_auto_backup() {
            return Ok(None);
        }
        self.create_backup(entries, settings, true, None).map(Some)
    }

    /// Delete every snapshot beyond the newest `max_backups`
    ///
    /// Best-effort: a file that cannot be deleted is skipped. Returns the
    /// names that were actually removed.
    pub fn cleanup(&self) -> Vec<String> {
        let keep = self.backup_settings().max_backups as usize;

        let deleted: Vec<String> = self
            .store
            .list()
            .into_iter()
            .skip(keep)
            .filter(|snapshot| self.store.delete(&snapshot.file_name))
            .map(|snapshot| snapshot.file_name)
            .collect();

        if !deleted.is_empty() {
            info!(deleted = deleted.len(), keep, "old snapshots removed");
        }
        deleted
    }

    /// User-initiated delete; not counted against retention
    pub fn delete_backup(&self, file_name: &str) -> bool {
        self.store.delete(file_name)
    }

    pub fn load_backup(&self, file_name: &str) -> TidrapportResult<(Vec<TimeEntry>, PaySettings)> {
        self.store.read(file_name).map_err(TidrapportError::backup)
    }

    /// All snapshots, newest first
    pub fn list_backups(&self) -> Vec<SnapshotMetadata> {
        self.store.list()
    }

    pub fn latest_backup(&self) -> Option<SnapshotMetadata> {
        self.store.list().into_iter().next()
    }

    pub fn backup_settings(&self) -> BackupSettings {
        BackupSettings::load(&self.preferences)
    }

    /// Replace the whole policy; values are stored as given
    pub fn update_backup_settings(&self, policy: &BackupSettings) -> TidrapportResult<()> {
        policy.save(&self.preferences)
    }

    /// When the last automatic backup succeeded, if ever
    pub fn last_auto_backup(&self) -> Option<DateTime<Utc>> {
        self.preferences.get_timestamp(LAST_AUTO_BACKUP)
    }
}
