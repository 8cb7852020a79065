//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use chrono::{Local, Utc};
use clap::Subcommand;
use tabled::{Table, Tabled};

use crate::backup::{apply_snapshot, validate_snapshot, BackupLifecycleManager};
use crate::config::preferences::{BackupSettings, JsonPreferences};
use crate::error::{TidrapportError, TidrapportResult};
use crate::storage::{SnapshotMetadata, Storage};

use super::backup_manager;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create {
        /// Short note shown when the backup is created
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all available backups
    List {
        /// Show creation times and the backup policy
        #[arg(short, long)]
        detailed: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup file name (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show information about a specific backup
    Info {
        /// Backup file name (use 'latest' for most recent)
        backup: String,
    },

    /// Delete a backup
    Delete {
        /// Backup file name
        backup: String,
    },

    /// Delete backups beyond the retention limit
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Create an automatic backup if one is due
    Auto,

    /// Show or change the backup policy
    #[command(subcommand)]
    Settings(BackupSettingsCommands),
}

/// Backup policy subcommands
#[derive(Subcommand)]
pub enum BackupSettingsCommands {
    /// Show the current policy
    Show,

    /// Change one or more policy values
    Set {
        /// Enable or disable automatic backups
        #[arg(long)]
        auto: Option<bool>,

        /// Hours between automatic backups
        #[arg(long)]
        interval_hours: Option<u32>,

        /// Number of backups to keep
        #[arg(long)]
        max_backups: Option<u32>,

        /// Take a due automatic backup after entry edits
        #[arg(long)]
        on_changes: Option<bool>,
    },
}

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    origin: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "Age")]
    age: String,
}

#[derive(Tabled)]
struct DetailedBackupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    origin: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Age")]
    age: String,
}

/// Handle a backup command
pub fn handle_backup_command(storage: &mut Storage, cmd: BackupCommands) -> TidrapportResult<()> {
    let manager = backup_manager(storage);

    match cmd {
        BackupCommands::Create { description } => {
            println!("Creating backup...");
            let entries = storage.entries.get_all()?;
            let snapshot =
                manager.create_backup(&entries, &storage.settings.pay, false, description)?;

            println!("Backup created: {}", snapshot.file_name);
            println!("Entries: {}", snapshot.entry_count);
            if let Some(description) = &snapshot.description {
                println!("Description: {}", description);
            }
            println!(
                "Location: {}",
                manager.store().dir().join(&snapshot.file_name).display()
            );
        }

        BackupCommands::List { detailed } => {
            let backups = manager.list_backups();

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: tidrapport backup create");
                return Ok(());
            }

            if detailed {
                let rows: Vec<DetailedBackupRow> = backups
                    .iter()
                    .enumerate()
                    .map(|(i, b)| DetailedBackupRow {
                        index: i + 1,
                        name: b.file_name.clone(),
                        origin: b.origin.to_string(),
                        entries: b.entry_count,
                        created: b
                            .created_at
                            .with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M")
                            .to_string(),
                        age: age(b),
                    })
                    .collect();
                println!("{}", Table::new(rows));
                println!();
                println!("Directory: {}", manager.store().dir().display());
                print_policy(&manager.backup_settings());
            } else {
                let rows: Vec<BackupRow> = backups
                    .iter()
                    .enumerate()
                    .map(|(i, b)| BackupRow {
                        index: i + 1,
                        name: b.file_name.clone(),
                        origin: b.origin.to_string(),
                        entries: b.entry_count,
                        age: age(b),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let file_name = resolve_backup_name(&manager, &backup)?;
            let validation = validate_snapshot(&manager, &file_name)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", file_name);
            println!("Contents: {}", validation.summary());
            println!("Hourly rate: {}", validation.pay.hourly_rate);
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current entries and pay settings!");
                println!("To proceed, run again with --force flag:");
                println!("  tidrapport backup restore {} --force", backup);
                return Ok(());
            }

            // Read before the safety backup, whose cleanup may evict this file
            let (entries, pay) = manager.load_backup(&file_name)?;

            println!("Creating backup of current data before restore...");
            let current = storage.entries.get_all()?;
            let pre_restore = manager.create_backup(
                &current,
                &storage.settings.pay,
                false,
                Some(format!("before restoring {}", file_name)),
            )?;
            println!("Pre-restore backup saved: {}", pre_restore.file_name);
            println!();

            println!("Restoring from backup...");
            let result = apply_snapshot(storage, &file_name, entries, pay)?;

            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Info { backup } => {
            let file_name = resolve_backup_name(&manager, &backup)?;
            let validation = validate_snapshot(&manager, &file_name)?;
            let metadata = manager
                .list_backups()
                .into_iter()
                .find(|b| b.file_name == file_name);

            println!("Backup Details");
            println!("==============");
            println!("File: {}", manager.store().dir().join(&file_name).display());
            if let Some(metadata) = &metadata {
                println!("Type: {}", metadata.origin);
                println!(
                    "Created: {}",
                    metadata
                        .created_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                );
            }
            println!();
            println!("Contents: {}", validation.summary());
            println!("Pay settings:");
            println!("  Hourly rate:        {}", validation.pay.hourly_rate);
            println!("  Tax rate:           {}%", validation.pay.tax_rate_percent);
            println!("  Red day multiplier: {}", validation.pay.red_day_multiplier);
            println!("  Sick pay:           {}%", validation.pay.sick_pay_percent);
        }

        BackupCommands::Delete { backup } => {
            let file_name = resolve_backup_name(&manager, &backup)?;
            if manager.delete_backup(&file_name) {
                println!("Deleted backup: {}", file_name);
            } else {
                return Err(TidrapportError::snapshot_not_found(file_name));
            }
        }

        BackupCommands::Prune { force } => {
            let policy = manager.backup_settings();
            let backups = manager.list_backups();
            let keep = policy.max_backups as usize;
            let to_delete = backups.len().saturating_sub(keep);

            if to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Retention policy keeps {} backup(s); you have {}.",
                    policy.max_backups,
                    backups.len()
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention policy: keep {}", policy.max_backups);
            println!("Current backups:  {}", backups.len());
            println!("To be deleted:");
            for backup in backups.iter().skip(keep) {
                println!("  {}", backup.file_name);
            }
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  tidrapport backup prune --force");
                return Ok(());
            }

            let deleted = manager.cleanup();
            println!("Deleted {} backup(s).", deleted.len());
        }

        BackupCommands::Auto => {
            let policy = manager.backup_settings();
            if !policy.auto_backup_enabled {
                println!("Automatic backups are disabled.");
                println!("Enable them with: tidrapport backup settings set --auto true");
                return Ok(());
            }

            let entries = storage.entries.get_all()?;
            match manager.maybe_create_auto_backup(&entries, &storage.settings.pay)? {
                Some(snapshot) => println!("Automatic backup created: {}", snapshot.file_name),
                None => {
                    let since = manager
                        .last_auto_backup()
                        .map(|last| format_duration(Utc::now().signed_duration_since(last)))
                        .unwrap_or_else(|| "never".to_string());
                    println!(
                        "No backup due (last automatic backup {} ago, interval {}h).",
                        since, policy.interval_hours
                    );
                }
            }
        }

        BackupCommands::Settings(BackupSettingsCommands::Show) => {
            print_policy(&manager.backup_settings());
            match manager.last_auto_backup() {
                Some(last) => println!(
                    "Last automatic backup: {}",
                    last.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ),
                None => println!("Last automatic backup: never"),
            }
        }

        BackupCommands::Settings(BackupSettingsCommands::Set {
            auto,
            interval_hours,
            max_backups,
            on_changes,
        }) => {
            let mut policy = manager.backup_settings();
            if let Some(auto) = auto {
                policy.auto_backup_enabled = auto;
            }
            if let Some(hours) = interval_hours {
                policy.interval_hours = hours;
            }
            if let Some(max) = max_backups {
                if max == 0 {
                    return Err(TidrapportError::Validation(
                        "max-backups must be at least 1".to_string(),
                    ));
                }
                policy.max_backups = max;
            }
            if let Some(on_changes) = on_changes {
                policy.backup_on_changes = on_changes;
            }

            manager.update_backup_settings(&policy)?;
            println!("Backup settings updated.");
            print_policy(&policy);
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a file name in the backup directory
fn resolve_backup_name(
    manager: &BackupLifecycleManager<JsonPreferences>,
    backup: &str,
) -> TidrapportResult<String> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_backup()
            .map(|b| b.file_name)
            .ok_or_else(|| TidrapportError::snapshot_not_found("latest"));
    }

    if manager.store().exists(backup) {
        return Ok(backup.to_string());
    }

    let with_ext = format!("{}.json", backup);
    if manager.store().exists(&with_ext) {
        return Ok(with_ext);
    }

    Err(TidrapportError::snapshot_not_found(backup))
}

fn print_policy(policy: &BackupSettings) {
    println!("Backup Settings");
    println!("===============");
    println!(
        "Automatic backups:  {}",
        if policy.auto_backup_enabled { "enabled" } else { "disabled" }
    );
    println!("Interval:           {}h", policy.interval_hours);
    println!("Keep:               {} backup(s)", policy.max_backups);
    println!(
        "Backup on changes:  {}",
        if policy.backup_on_changes { "yes" } else { "no" }
    );
}

fn age(snapshot: &SnapshotMetadata) -> String {
    format_duration(Utc::now().signed_duration_since(snapshot.created_at))
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    let months = days / 30;
    format!("{}mo", months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TidrapportPaths;
    use crate::models::TimeEntry;
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TidrapportPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn day(d: u32) -> TimeEntry {
        TimeEntry::new(NaiveDate::from_ymd_opt(2025, 8, d).unwrap())
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(30)), "30s");
        assert_eq!(format_duration(Duration::minutes(5)), "5m");
        assert_eq!(format_duration(Duration::hours(3)), "3h");
        assert_eq!(format_duration(Duration::days(2)), "2d");
        assert_eq!(format_duration(Duration::days(65)), "2mo");
        assert_eq!(format_duration(Duration::seconds(-10)), "0s");
    }

    #[test]
    fn test_resolve_backup_name() {
        let (_temp, storage) = create_test_storage();
        let manager = backup_manager(&storage);
        let snapshot = manager
            .create_backup(&[], &storage.settings.pay, false, None)
            .unwrap();

        assert_eq!(
            resolve_backup_name(&manager, "latest").unwrap(),
            snapshot.file_name
        );
        let stem = snapshot.file_name.trim_end_matches(".json");
        assert_eq!(resolve_backup_name(&manager, stem).unwrap(), snapshot.file_name);
        assert!(resolve_backup_name(&manager, "nope")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_latest_without_backups() {
        let (_temp, storage) = create_test_storage();
        let manager = backup_manager(&storage);

        assert!(resolve_backup_name(&manager, "latest")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_restore_requires_force() {
        let (_temp, mut storage) = create_test_storage();
        let manager = backup_manager(&storage);
        let snapshot = manager
            .create_backup(&[day(1)], &storage.settings.pay, false, None)
            .unwrap();
        storage.entries.upsert(day(2)).unwrap();

        handle_backup_command(
            &mut storage,
            BackupCommands::Restore {
                backup: snapshot.file_name.clone(),
                force: false,
            },
        )
        .unwrap();
        assert!(storage.entries.get(day(2).date).unwrap().is_some());
        assert_eq!(manager.list_backups().len(), 1);
    }

    #[test]
    fn test_forced_restore_takes_safety_backup() {
        let (_temp, mut storage) = create_test_storage();
        let manager = backup_manager(&storage);
        let snapshot = manager
            .create_backup(&[day(1)], &storage.settings.pay, false, None)
            .unwrap();
        storage.entries.upsert(day(2)).unwrap();
        storage.entries.upsert(day(3)).unwrap();

        handle_backup_command(
            &mut storage,
            BackupCommands::Restore {
                backup: snapshot.file_name.clone(),
                force: true,
            },
        )
        .unwrap();

        assert_eq!(storage.entries.count().unwrap(), 1);
        assert!(storage.entries.get(day(1).date).unwrap().is_some());

        let backups = manager.list_backups();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].entry_count, 2);
    }

    #[test]
    fn test_settings_set_persists() {
        let (_temp, mut storage) = create_test_storage();

        handle_backup_command(
            &mut storage,
            BackupCommands::Settings(BackupSettingsCommands::Set {
                auto: Some(true),
                interval_hours: Some(6),
                max_backups: None,
                on_changes: Some(false),
            }),
        )
        .unwrap();

        let policy = backup_manager(&storage).backup_settings();
        assert!(policy.auto_backup_enabled);
        assert_eq!(policy.interval_hours, 6);
        assert_eq!(policy.max_backups, 10);
        assert!(!policy.backup_on_changes);
    }

    #[test]
    fn test_settings_rejects_zero_max() {
        let (_temp, mut storage) = create_test_storage();

        let err = handle_backup_command(
            &mut storage,
            BackupCommands::Settings(BackupSettingsCommands::Set {
                auto: None,
                interval_hours: None,
                max_backups: Some(0),
                on_changes: None,
            }),
        )
        .unwrap_err();
        assert!(matches!(err, TidrapportError::Validation(_)));
    }

    #[test]
    fn test_delete_missing_backup() {
        let (_temp, mut storage) = create_test_storage();

        let err = handle_backup_command(
            &mut storage,
            BackupCommands::Delete {
                backup: "manual_backup_2020-01-01_00-00.json".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
