//! Backup system for Tidrapport
//!
//! Snapshots of the time entries and pay settings, taken manually or on an
//! hourly interval, with a bounded number kept on disk.
//!
//! # Architecture
//!
//! - [`SnapshotStore`](crate::storage::SnapshotStore) names, writes, reads,
//!   lists and deletes snapshot files. It has no notion of policy.
//! - [`BackupLifecycleManager`] decides when an automatic backup is due,
//!   creates snapshots, and evicts the oldest ones beyond `max_backups`.
//! - [`restore`] puts a snapshot's contents back into the working journal.
//!
//! # Snapshot names
//!
//! `{prefix}_{yyyy-MM-dd_HH-mm}.json` where the prefix is `auto_backup`,
//! `manual_backup`, or `tidrapport` for report saves. Anything not starting
//! with `auto_backup` counts as manual.
//!
//! # Retention
//!
//! After every backup the manager lists all snapshots newest first and
//! deletes everything past the configured count (default 10). Deletion is
//! best-effort; files that fail to delete are retried on the next pass.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidrapport::backup::BackupLifecycleManager;
//! use tidrapport::config::{JsonPreferences, TidrapportPaths};
//! use tidrapport::storage::SnapshotStore;
//!
//! let paths = TidrapportPaths::new()?;
//! let manager = BackupLifecycleManager::new(
//!     SnapshotStore::new(paths.backup_dir()),
//!     JsonPreferences::new(paths.preferences_file()),
//! );
//!
//! if manager.should_create_auto_backup() {
//!     manager.create_backup(&entries, &pay, true, None)?;
//! }
//! ```

pub mod lifecycle;
pub mod restore;

pub use lifecycle::BackupLifecycleManager;
pub use restore::{apply_snapshot, restore_snapshot, validate_snapshot, RestoreResult, ValidationResult};
