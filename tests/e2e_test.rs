//! End-to-end CLI tests. Network-dependent paths are not exercised
//! here; these cover the argument surface and error reporting.

use assert_cmd::Command;
use predicates::prelude::*;

fn pomscan() -> Command {
    Command::cargo_bin("pomscan").expect("binary must build")
}

#[test]
fn test_help_describes_usage() {
    pomscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transitive dependency inventory"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--registry"));
}

#[test]
fn test_version_flag() {
    pomscan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pomscan"));
}

#[test]
fn test_missing_manifest_is_application_error() {
    let dir = tempfile::tempdir().unwrap();
    pomscan()
        .arg(dir.path().join("nope").to_str().unwrap())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no pom.xml found"));
}

#[test]
fn test_directory_without_pom_is_application_error() {
    let dir = tempfile::tempdir().unwrap();
    pomscan()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no pom.xml found"));
}

#[test]
fn test_invalid_format_is_usage_error() {
    pomscan()
        .args(["--format", "yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid format"));
}
