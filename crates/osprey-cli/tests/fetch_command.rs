use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_osprey_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("osprey")
}

#[test]
fn test_help_lists_fetch() {
    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("marketplace"));
}

#[test]
fn test_fetch_help_lists_flags() {
    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("fetch").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--extensions"))
        .stdout(predicate::str::contains("--download-dir"))
        .stdout(predicate::str::contains("--chrome-path"))
        .stdout(predicate::str::contains("--download-timeout"));
}

#[test]
fn test_fetch_requires_extensions() {
    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("fetch");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--extensions"));
}

#[test]
fn test_fetch_rejects_blank_extension_list() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("fetch")
        .arg("--extensions")
        .arg(" , ")
        .arg("--download-dir")
        .arg(temp.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no extension names"));
}

#[test]
fn test_fetch_fails_on_missing_chrome() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_osprey_bin());
    cmd.arg("fetch")
        .arg("--extensions")
        .arg("Prettier - Code formatter")
        .arg("--download-dir")
        .arg(temp.path())
        .arg("--chrome-path")
        .arg("/nonexistent/chrome");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Chrome not found"));
}
