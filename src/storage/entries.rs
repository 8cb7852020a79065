//! Time entry repository for JSON storage
//!
//! Manages loading and saving the working set of entries to entries.json.
//! There is at most one entry per date.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::TidrapportError;
use crate::models::TimeEntry;

use super::file_io::{read_json, write_json_atomic};

/// Serializable entry file structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<TimeEntry>,
}

/// Repository for time entry persistence
pub struct EntryRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<NaiveDate, TimeEntry>>,
}

impl EntryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load entries from disk, replacing what is in memory
    pub fn load(&self) -> Result<(), TidrapportError> {
        let file_data: EntryData = read_json(&self.path)?;
        self.replace_all(file_data.entries)
    }

    /// Save entries to disk
    pub fn save(&self) -> Result<(), TidrapportError> {
        let file_data = EntryData {
            entries: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// All entries in date order
    pub fn get_all(&self) -> Result<Vec<TimeEntry>, TidrapportError> {
        let data = self.data.read().map_err(|e| {
            TidrapportError::Io(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().cloned().collect())
    }

    pub fn get(&self, date: NaiveDate) -> Result<Option<TimeEntry>, TidrapportError> {
        let data = self.data.read().map_err(|e| {
            TidrapportError::Io(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&date).cloned())
    }

    /// Insert an entry, replacing any entry for the same date
    pub fn upsert(&self, entry: TimeEntry) -> Result<(), TidrapportError> {
        let mut data = self.data.write().map_err(|e| {
            TidrapportError::Io(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(entry.date, entry);
        Ok(())
    }

    /// Remove the entry for a date; true if one existed
    pub fn remove(&self, date: NaiveDate) -> Result<bool, TidrapportError> {
        let mut data = self.data.write().map_err(|e| {
            TidrapportError::Io(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&date).is_some())
    }

    /// Replace the whole working set, as when restoring a snapshot
    pub fn replace_all(&self, entries: Vec<TimeEntry>) -> Result<(), TidrapportError> {
        let mut data = self.data.write().map_err(|e| {
            TidrapportError::Io(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        data.extend(entries.into_iter().map(|entry| (entry.date, entry)));
        Ok(())
    }

    pub fn count(&self) -> Result<usize, TidrapportError> {
        let data = self.data.read().map_err(|e| {
            TidrapportError::Io(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn create_test_repo() -> (TempDir, EntryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entries.json");
        let repo = EntryRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_replaces_same_date() {
        let (_temp_dir, repo) = create_test_repo();

        repo.upsert(TimeEntry::new(date(5))).unwrap();
        let mut sick = TimeEntry::new(date(5));
        sick.sick_day = true;
        repo.upsert(sick).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.get(date(5)).unwrap().unwrap().sick_day);
    }

    #[test]
    fn test_save_and_load_in_date_order() {
        let (temp_dir, repo) = create_test_repo();

        repo.upsert(TimeEntry::new(date(9))).unwrap();
        repo.upsert(TimeEntry::new(date(2))).unwrap();
        repo.save().unwrap();

        let repo2 = EntryRepository::new(temp_dir.path().join("entries.json"));
        repo2.load().unwrap();

        let dates: Vec<_> = repo2.get_all().unwrap().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2), date(9)]);
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(TimeEntry::new(date(1))).unwrap();

        assert!(repo.remove(date(1)).unwrap());
        assert!(!repo.remove(date(1)).unwrap());
    }

    #[test]
    fn test_replace_all() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(TimeEntry::new(date(1))).unwrap();

        repo.replace_all(vec![TimeEntry::new(date(3)), TimeEntry::new(date(4))])
            .unwrap();

        assert!(repo.get(date(1)).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 2);
    }
}
