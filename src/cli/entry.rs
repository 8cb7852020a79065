//! Entry CLI commands
//!
//! Implements CLI commands for the time entry journal.

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use tabled::{Table, Tabled};
use tracing::warn;

use crate::error::{TidrapportError, TidrapportResult};
use crate::models::{Money, TimeEntry};
use crate::storage::Storage;

use super::backup_manager;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add or replace the entry for a date
    Add {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Shift start (HH:MM)
        #[arg(short, long)]
        start: Option<String>,
        /// Shift end (HH:MM); earlier than start means past midnight
        #[arg(short, long)]
        end: Option<String>,
        /// Break in minutes
        #[arg(short, long = "break", default_value = "0")]
        break_minutes: u32,
        /// Public holiday
        #[arg(long)]
        red_day: bool,
        /// Sick day
        #[arg(long)]
        sick_day: bool,
    },
    /// List all entries
    List,
    /// Remove the entry for a date
    Remove {
        /// Date (YYYY-MM-DD)
        date: String,
    },
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    weekday: &'static str,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Break")]
    break_minutes: u32,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl EntryRow {
    fn new(entry: &TimeEntry, date_format: &str) -> Self {
        let mut flags = Vec::new();
        if entry.red_day {
            flags.push("red day");
        }
        if entry.sick_day {
            flags.push("sick");
        }

        Self {
            date: format_date(entry.date, date_format),
            weekday: entry.weekday_name(),
            start: format_time(entry.start_time),
            end: format_time(entry.end_time),
            break_minutes: entry.break_minutes,
            hours: format!("{:.2}", entry.worked_hours()),
            gross: entry.gross_pay.to_string(),
            net: entry.net_pay.to_string(),
            flags: flags.join(", "),
        }
    }
}

/// Handle an entry command
pub fn handle_entry_command(storage: &Storage, cmd: EntryCommands) -> TidrapportResult<()> {
    match cmd {
        EntryCommands::Add {
            date,
            start,
            end,
            break_minutes,
            red_day,
            sick_day,
        } => {
            let mut entry = TimeEntry::new(parse_date(&date)?);
            entry.start_time = start.as_deref().map(parse_time).transpose()?;
            entry.end_time = end.as_deref().map(parse_time).transpose()?;
            entry.break_minutes = break_minutes;
            entry.red_day = red_day;
            entry.sick_day = sick_day;

            entry
                .validate()
                .map_err(|e| TidrapportError::Validation(e.to_string()))?;
            entry.recalculate(&storage.settings.pay);

            let replaced = storage.entries.get(entry.date)?.is_some();
            storage.entries.upsert(entry.clone())?;
            storage.entries.save()?;

            println!(
                "{} entry for {} ({})",
                if replaced { "Updated" } else { "Added" },
                entry.date,
                entry.weekday_name()
            );
            println!("  Hours: {:.2}", entry.worked_hours());
            println!("  Gross: {}", entry.gross_pay);
            println!("  Tax:   {}", entry.tax);
            println!("  Net:   {}", entry.net_pay);

            after_entry_change(storage)?;
        }

        EntryCommands::List => {
            let entries = storage.entries.get_all()?;
            if entries.is_empty() {
                println!("No entries found.");
                println!("Add one with: tidrapport entry add <YYYY-MM-DD> --start 08:00 --end 16:00");
                return Ok(());
            }

            let total_minutes: u32 = entries.iter().map(|e| e.worked_minutes).sum();
            let gross: Money = entries.iter().map(|e| e.gross_pay).sum();
            let net: Money = entries.iter().map(|e| e.net_pay).sum();

            let rows: Vec<EntryRow> = entries
                .iter()
                .map(|e| EntryRow::new(e, &storage.settings.date_format))
                .collect();
            println!("{}", Table::new(rows));
            println!();
            println!(
                "Total: {} entries, {:.2} hours, {} gross, {} net",
                entries.len(),
                f64::from(total_minutes) / 60.0,
                gross,
                net
            );
        }

        EntryCommands::Remove { date } => {
            let date = parse_date(&date)?;
            if !storage.entries.remove(date)? {
                return Err(TidrapportError::entry_not_found(date.to_string()));
            }
            storage.entries.save()?;
            println!("Removed entry for {}", date);

            after_entry_change(storage)?;
        }
    }

    Ok(())
}

/// Take an automatic backup after an edit when the policy asks for one
///
/// A failed backup is reported but does not undo the edit.
fn after_entry_change(storage: &Storage) -> TidrapportResult<()> {
    let manager = backup_manager(storage);
    if !manager.backup_settings().backup_on_changes {
        return Ok(());
    }

    let entries = storage.entries.get_all()?;
    match manager.maybe_create_auto_backup(&entries, &storage.settings.pay) {
        Ok(Some(snapshot)) => println!("Automatic backup created: {}", snapshot.file_name),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "automatic backup after edit failed"),
    }
    Ok(())
}

fn parse_date(s: &str) -> TidrapportResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        TidrapportError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s))
    })
}

fn parse_time(s: &str) -> TidrapportResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| TidrapportError::Validation(format!("Invalid time: '{}'. Use HH:MM", s)))
}

/// Format with the configured pattern, falling back to ISO for a bad one
fn format_date(date: NaiveDate, pattern: &str) -> String {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return date.to_string();
    }
    date.format(pattern).to_string()
}

fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TidrapportPaths;
    use crate::config::preferences::BackupSettings;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TidrapportPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add(date: &str, start: Option<&str>, end: Option<&str>) -> EntryCommands {
        EntryCommands::Add {
            date: date.to_string(),
            start: start.map(String::from),
            end: end.map(String::from),
            break_minutes: 0,
            red_day: false,
            sick_day: false,
        }
    }

    #[test]
    fn test_add_computes_pay_and_persists() {
        let (_temp, storage) = create_test_storage();

        handle_entry_command(&storage, add("2025-05-05", Some("08:00"), Some("12:00"))).unwrap();

        let entry = storage
            .entries
            .get(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(entry.worked_minutes, 240);
        assert_eq!(entry.gross_pay.ore(), 60000);
        assert!(storage.paths().entries_file().exists());
    }

    #[test]
    fn test_add_rejects_half_shift() {
        let (_temp, storage) = create_test_storage();

        let err = handle_entry_command(&storage, add("2025-05-05", Some("08:00"), None)).unwrap_err();
        assert!(matches!(err, TidrapportError::Validation(_)));
        assert_eq!(storage.entries.count().unwrap(), 0);
    }

    #[test]
    fn test_add_rejects_bad_date() {
        let (_temp, storage) = create_test_storage();

        let err = handle_entry_command(&storage, add("05/05/2025", None, None)).unwrap_err();
        assert!(matches!(err, TidrapportError::Validation(_)));
    }

    #[test]
    fn test_format_date_patterns() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
        assert_eq!(format_date(date, "%d/%m/%Y"), "05/05/2025");
        assert_eq!(format_date(date, "%Q"), "2025-05-05");
    }

    #[test]
    fn test_remove_missing_entry() {
        let (_temp, storage) = create_test_storage();

        let err = handle_entry_command(
            &storage,
            EntryCommands::Remove {
                date: "2025-05-05".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_edit_triggers_due_auto_backup() {
        let (_temp, storage) = create_test_storage();
        let manager = backup_manager(&storage);
        manager
            .update_backup_settings(&BackupSettings {
                auto_backup_enabled: true,
                ..BackupSettings::default()
            })
            .unwrap();

        handle_entry_command(&storage, add("2025-05-05", Some("08:00"), Some("12:00"))).unwrap();
        assert_eq!(manager.list_backups().len(), 1);
        assert!(manager.last_auto_backup().is_some());

        // Not due again within the interval
        handle_entry_command(&storage, add("2025-05-06", Some("08:00"), Some("12:00"))).unwrap();
        assert_eq!(manager.list_backups().len(), 1);
    }

    #[test]
    fn test_edit_without_backup_on_changes() {
        let (_temp, storage) = create_test_storage();
        let manager = backup_manager(&storage);
        manager
            .update_backup_settings(&BackupSettings {
                auto_backup_enabled: true,
                backup_on_changes: false,
                ..BackupSettings::default()
            })
            .unwrap();

        handle_entry_command(&storage, add("2025-05-05", None, None)).unwrap();
        assert!(manager.list_backups().is_empty());
    }
}
