//! Smoke tests for the sspm CLI.
//!
//! These tests verify basic CLI functionality:
//! - `sspm --version` outputs version info
//! - `sspm --help` outputs help text
//! - `sspm version` outputs valid JSON

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    TestEnv::new()
        .sspm()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sspm"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    TestEnv::new()
        .sspm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("project"));
}

#[test]
fn test_version_command_outputs_json() {
    let env = TestEnv::new();
    let info = env.json(&["version"]);
    assert_eq!(info["name"], "sspm");
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_human_readable_flag() {
    TestEnv::new()
        .sspm()
        .args(["version", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("sspm "));
}

#[test]
fn test_project_help() {
    TestEnv::new()
        .sspm()
        .args(["project", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("close"));
}

#[test]
fn test_unconfigured_error_is_json() {
    TestEnv::new()
        .sspm()
        .args(["project", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(r#"{"error":"#))
        .stderr(predicate::str::contains("sspm init"));
}

#[test]
fn test_unconfigured_error_human() {
    TestEnv::new()
        .sspm()
        .args(["-H", "stats", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: sspm is not configured"));
}
