//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

/// `dbadmin` with an empty home and working directory, so no config or
/// .env file leaks in
fn dbadmin(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dbadmin").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .current_dir(home.path());
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("insert"))
        .stdout(predicate::str::contains("graph"));
}

#[test]
fn test_update_help() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home)
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Row label"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dbadmin"));
}

#[test]
fn test_reports_without_database() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home)
        .args(["reports", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab-equipment"));
}

#[test]
fn test_config_init_then_path() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join(".dbadmin/config.toml").exists());

    // Second init refuses to overwrite
    dbadmin(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    dbadmin(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_missing_database_url_is_reported() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home)
        .args(["tables", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database URL"));
}

#[test]
fn test_update_requires_row_selector() {
    let home = tempfile::tempdir().unwrap();
    dbadmin(&home)
        .args(["update", "t", "a=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--key"));
}
