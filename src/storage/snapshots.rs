//! Snapshot store
//!
//! Owns the backup directory and knows how snapshot files are named,
//! written, read, listed and deleted. It knows nothing about retention;
//! that policy lives in [`crate::backup::BackupLifecycleManager`].
//!
//! Snapshot names follow `{prefix}_{yyyy-MM-dd_HH-mm}.json` in local time.
//! A second snapshot with the same prefix in the same minute gets a
//! `_2`, `_3`, ... suffix instead of overwriting the first.

use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::file_io::write_text_atomic;
use super::serializer::{JsonSnapshotSerializer, SnapshotSerializer};
use crate::error::{TidrapportError, TidrapportResult};
use crate::models::{PaySettings, TimeEntry};

/// Prefix of snapshots taken by the automatic scheduler
pub const AUTO_BACKUP_PREFIX: &str = "auto_backup";
/// Prefix of snapshots requested by the user
pub const MANUAL_BACKUP_PREFIX: &str = "manual_backup";
/// Prefix of user-facing report saves sharing the backup directory
pub const REPORT_PREFIX: &str = "tidrapport";

/// strftime pattern of the timestamp embedded in snapshot names
const NAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";
/// Byte length of a rendered `yyyy-MM-dd_HH-mm` timestamp
const NAME_TIMESTAMP_LEN: usize = 16;

/// How a snapshot came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotOrigin {
    Automatic,
    Manual,
}

impl SnapshotOrigin {
    /// File name prefix used when writing a snapshot of this origin
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Automatic => AUTO_BACKUP_PREFIX,
            Self::Manual => MANUAL_BACKUP_PREFIX,
        }
    }

    /// Automatic iff the name carries the automatic prefix
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.starts_with(AUTO_BACKUP_PREFIX) {
            Self::Automatic
        } else {
            Self::Manual
        }
    }
}

impl std::fmt::Display for SnapshotOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Summary of one snapshot file, derived from its name and content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// File name inside the backup directory; identifies the snapshot
    pub file_name: String,
    /// Taken from the name when parseable, otherwise the listing time
    pub created_at: DateTime<Utc>,
    /// Number of entries, zero when the file cannot be read
    pub entry_count: usize,
    pub origin: SnapshotOrigin,
    pub description: Option<String>,
}

/// Reads and writes snapshot files in one directory
#[derive(Debug, Clone)]
pub struct SnapshotStore<S: SnapshotSerializer = JsonSnapshotSerializer> {
    dir: PathBuf,
    serializer: S,
}

impl SnapshotStore<JsonSnapshotSerializer> {
    /// Create a store over `dir` writing JSON snapshots
    pub fn new(dir: PathBuf) -> Self {
        Self::with_serializer(dir, JsonSnapshotSerializer)
    }
}

impl<S: SnapshotSerializer> SnapshotStore<S> {
    pub fn with_serializer(dir: PathBuf, serializer: S) -> Self {
        Self { dir, serializer }
    }

    /// The backup directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a snapshot for the given origin, returning its file name
    pub fn write(
        &self,
        entries: &[TimeEntry],
        settings: &PaySettings,
        origin: SnapshotOrigin,
    ) -> TidrapportResult<String> {
        self.write_with_prefix(origin.prefix(), entries, settings)
    }

    /// Write a snapshot under an arbitrary prefix, returning its file name
    pub fn write_with_prefix(
        &self,
        prefix: &str,
        entries: &[TimeEntry],
        settings: &PaySettings,
    ) -> TidrapportResult<String> {
        let text = self.serializer.serialize(entries, settings)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            TidrapportError::Io(format!(
                "Failed to create backup directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let stamp = Local::now().format(NAME_TIMESTAMP_FORMAT).to_string();
        let file_name = self.unique_file_name(prefix, &stamp);
        write_text_atomic(self.dir.join(&file_name), &text)?;

        info!(file = %file_name, entries = entries.len(), "snapshot written");
        Ok(file_name)
    }

    /// Read a snapshot back into entries and settings
    pub fn read(&self, file_name: &str) -> TidrapportResult<(Vec<TimeEntry>, PaySettings)> {
        let path = self
            .resolve(file_name)
            .filter(|p| p.is_file())
            .ok_or_else(|| TidrapportError::snapshot_not_found(file_name))?;

        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TidrapportError::snapshot_not_found(file_name),
            ErrorKind::InvalidData => {
                TidrapportError::CorruptData(format!("{} is not valid UTF-8", file_name))
            }
            _ => TidrapportError::Io(format!("Failed to read {}: {}", file_name, e)),
        })?;

        self.serializer.deserialize(&text)
    }

    /// List all snapshots, newest first
    ///
    /// Never fails: an unreadable directory yields an empty list and a bad
    /// file only degrades its own metadata.
    pub fn list(&self) -> Vec<SnapshotMetadata> {
        let dir_entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(dir = %self.dir.display(), error = %e, "failed to read backup directory");
                }
                return Vec::new();
            }
        };

        let extension = self.serializer.extension();
        let mut snapshots: Vec<SnapshotMetadata> = dir_entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().map_or(false, |ext| ext == extension))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .map(|file_name| self.describe(file_name))
            .collect();

        snapshots.sort_by(newest_first);
        snapshots
    }

    /// Delete a snapshot; true iff it existed and was removed
    pub fn delete(&self, file_name: &str) -> bool {
        let Some(path) = self.resolve(file_name) else {
            return false;
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(file = %file_name, "snapshot deleted");
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(file = %file_name, error = %e, "failed to delete snapshot");
                false
            }
        }
    }

    pub fn exists(&self, file_name: &str) -> bool {
        self.resolve(file_name).map_or(false, |p| p.is_file())
    }

    /// Build metadata for one file; never fails
    fn describe(&self, file_name: String) -> SnapshotMetadata {
        let created_at = parse_snapshot_timestamp(&file_name).unwrap_or_else(|| {
            debug!(file = %file_name, "no timestamp in snapshot name, using current time");
            Utc::now()
        });

        let entry_count = match self.read(&file_name) {
            Ok((entries, _)) => entries.len(),
            Err(e) => {
                warn!(file = %file_name, error = %e, "unreadable snapshot listed with zero entries");
                0
            }
        };

        SnapshotMetadata {
            origin: SnapshotOrigin::from_file_name(&file_name),
            file_name,
            created_at,
            entry_count,
            description: None,
        }
    }

    /// Next free name for this prefix and minute
    ///
    /// The sequence is shared by every prefix stamped with the same minute
    /// and continues past the highest existing number, so a new file always
    /// sorts after every snapshot already present for that minute.
    fn unique_file_name(&self, prefix: &str, stamp: &str) -> String {
        let extension = self.serializer.extension();
        let stem = format!("{}_{}", prefix, stamp);

        let highest = fs::read_dir(&self.dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
            .filter_map(|name| sibling_index(&name, stamp, extension))
            .max();

        match highest {
            None => format!("{}.{}", stem, extension),
            Some(n) => format!("{}_{}.{}", stem, n + 1, extension),
        }
    }

    /// Join a bare file name onto the directory; rejects anything path-like
    fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let is_bare = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        is_bare.then(|| self.dir.join(file_name))
    }
}

/// Order by creation time descending; same-minute ties by collision suffix
fn newest_first(a: &SnapshotMetadata, b: &SnapshotMetadata) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| collision_index(&b.file_name).cmp(&collision_index(&a.file_name)))
        .then_with(|| b.file_name.cmp(&a.file_name))
}

/// Extract the embedded `yyyy-MM-dd_HH-mm` timestamp from a snapshot name
///
/// The pattern may appear anywhere in the name; the first window that
/// forms a valid local date-time wins. A time repeated when clocks go back
/// maps to its earlier instant, so the two passes through that hour are
/// not distinguished.
pub fn parse_snapshot_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    timestamp_windows(file_name).find_map(|(_, naive)| {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    })
}

/// Sequence number of a same-minute snapshot: `_N` after the timestamp, else 1
fn collision_index(file_name: &str) -> u32 {
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
    timestamp_windows(stem)
        .next()
        .and_then(|(start, _)| {
            stem[start + NAME_TIMESTAMP_LEN..]
                .strip_prefix('_')?
                .parse()
                .ok()
        })
        .unwrap_or(1)
}

/// Sequence number of `name` if it is `*_{stamp}.{ext}` (1) or `*_{stamp}_N.{ext}` (N)
fn sibling_index(name: &str, stamp: &str, extension: &str) -> Option<u32> {
    let stem = name.strip_suffix(extension)?.strip_suffix('.')?;
    let (start, _) = timestamp_windows(stem).next()?;
    let end = start + NAME_TIMESTAMP_LEN;
    if &stem[start..end] != stamp {
        return None;
    }

    let rest = &stem[end..];
    if rest.is_empty() {
        return Some(1);
    }
    rest.strip_prefix('_')?.parse().ok()
}

/// All positions where a valid `yyyy-MM-dd_HH-mm` window starts
fn timestamp_windows(name: &str) -> impl Iterator<Item = (usize, NaiveDateTime)> + '_ {
    let bytes = name.as_bytes();
    (0..=bytes.len().saturating_sub(NAME_TIMESTAMP_LEN))
        .filter(move |&start| bytes.len() >= start + NAME_TIMESTAMP_LEN)
        .filter_map(move |start| {
            parse_timestamp_window(&bytes[start..start + NAME_TIMESTAMP_LEN]).map(|dt| (start, dt))
        })
}

fn parse_timestamp_window(window: &[u8]) -> Option<NaiveDateTime> {
    const SEPARATORS: [(usize, u8); 4] = [(4, b'-'), (7, b'-'), (10, b'_'), (13, b'-')];

    let shape_ok = window.iter().enumerate().all(|(i, &b)| {
        match SEPARATORS.iter().find(|(pos, _)| *pos == i) {
            Some((_, sep)) => b == *sep,
            None => b.is_ascii_digit(),
        }
    });
    if !shape_ok {
        return None;
    }

    let number = |range: std::ops::Range<usize>| -> Option<u32> {
        std::str::from_utf8(&window[range]).ok()?.parse().ok()
    };

    let year = number(0..4)? as i32;
    let date = NaiveDate::from_ymd_opt(year, number(5..7)?, number(8..10)?)?;
    let time = NaiveTime::from_hms_opt(number(11..13)?, number(14..16)?, 0)?;
    Some(NaiveDateTime::new(date, time))
}
