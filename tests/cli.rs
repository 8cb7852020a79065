use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tidrapport(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tidrapport").unwrap();
    cmd.env("TIDRAPPORT_DATA_DIR", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn add_shift(data_dir: &TempDir, date: &str) {
    tidrapport(data_dir)
        .args(["entry", "add", date, "--start", "08:00", "--end", "16:30", "--break", "30"])
        .assert()
        .success();
}

fn backup_files(data_dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(data_dir.path().join("backups"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_add_and_list_entries() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["entry", "add", "2025-03-03", "--start", "08:00", "--end", "16:30", "--break", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added entry for 2025-03-03 (Måndag)"))
        .stdout(predicate::str::contains("1200,00 kr"));

    tidrapport(&data_dir)
        .args(["entry", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Måndag"))
        .stdout(predicate::str::contains("Total: 1 entries"));
}

#[test]
fn test_invalid_time_fails() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["entry", "add", "2025-03-03", "--start", "8am", "--end", "16:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time"));
}

#[test]
fn test_backup_create_and_list() {
    let data_dir = TempDir::new().unwrap();
    add_shift(&data_dir, "2025-03-03");

    tidrapport(&data_dir)
        .args(["backup", "create", "--description", "before payroll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: manual_backup_"))
        .stdout(predicate::str::contains("before payroll"));

    tidrapport(&data_dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("manual_backup_"))
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}

#[test]
fn test_same_minute_backups_do_not_overwrite() {
    let data_dir = TempDir::new().unwrap();

    for _ in 0..3 {
        tidrapport(&data_dir).args(["backup", "create"]).assert().success();
    }

    assert_eq!(backup_files(&data_dir).len(), 3);
}

#[test]
fn test_retention_limit_applies() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["backup", "settings", "set", "--max-backups", "2"])
        .assert()
        .success();

    for _ in 0..4 {
        tidrapport(&data_dir).args(["backup", "create"]).assert().success();
    }

    assert_eq!(backup_files(&data_dir).len(), 2);
}

#[test]
fn test_restore_latest() {
    let data_dir = TempDir::new().unwrap();
    add_shift(&data_dir, "2025-03-03");

    tidrapport(&data_dir).args(["backup", "create"]).assert().success();
    add_shift(&data_dir, "2025-03-04");

    tidrapport(&data_dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    tidrapport(&data_dir)
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete!"));

    tidrapport(&data_dir)
        .args(["entry", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-03"))
        .stdout(predicate::str::contains("2025-03-04").not());
}

#[test]
fn test_restore_unknown_backup_fails() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["backup", "restore", "manual_backup_2000-01-01_00-00.json", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_auto_backup_when_disabled() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["backup", "auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));

    assert!(backup_files(&data_dir).is_empty());
}

#[test]
fn test_auto_backup_once_per_interval() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["backup", "settings", "set", "--auto", "true", "--on-changes", "false"])
        .assert()
        .success();

    tidrapport(&data_dir)
        .args(["backup", "auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auto_backup_"));

    tidrapport(&data_dir)
        .args(["backup", "auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backup due"));

    assert_eq!(backup_files(&data_dir).len(), 1);
}

#[test]
fn test_save_writes_report_snapshot() {
    let data_dir = TempDir::new().unwrap();
    add_shift(&data_dir, "2025-03-03");

    tidrapport(&data_dir)
        .arg("save")
        .assert()
        .success()
        .stdout(predicate::str::contains("tidrapport_"));

    let files = backup_files(&data_dir);
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("tidrapport_"));
}

#[test]
fn test_export_tsv() {
    let data_dir = TempDir::new().unwrap();
    add_shift(&data_dir, "2025-03-03");
    let output = data_dir.path().join("report.tsv");

    tidrapport(&data_dir)
        .args(["export", output.to_str().unwrap()])
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("Datum\tVeckodag\tStart"));
    assert!(content.contains("2025-03-03\tMåndag\t08:00\t16:30\t30\t8.00\t1200.00"));
}

#[test]
fn test_config_updates_hourly_rate() {
    let data_dir = TempDir::new().unwrap();

    tidrapport(&data_dir)
        .args(["config", "--hourly-rate", "165,50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("165,50 kr"));

    tidrapport(&data_dir)
        .args(["config", "--tax-rate", "140"])
        .assert()
        .failure();
}
