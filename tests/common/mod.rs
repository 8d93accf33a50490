//! Common test utilities for sspm integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.config/sspm/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
pub use tempfile::TempDir;

/// A test environment with isolated configuration and projects root.
///
/// Each `TestEnv` creates two temporary directories:
/// - `config_dir`: Holds `sspm.ini` (via `SSPM_CONFIG_DIR` env var)
/// - `projects_dir`: The projects root (`projects.location`)
///
/// The `sspm()` method returns a `Command` that sets `SSPM_CONFIG_DIR`
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
    pub projects_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            projects_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and point sspm at its projects root.
    ///
    /// Git is switched off; tests that need it turn it back on.
    pub fn init() -> Self {
        let env = Self::new();
        env.sspm()
            .args(["init", "--location"])
            .arg(env.projects_dir.path())
            .assert()
            .success();
        env.sspm()
            .args(["config", "set", "tools.use_git", "False"])
            .assert()
            .success();
        env
    }

    /// Get a Command for the sspm binary with isolated configuration.
    pub fn sspm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sspm"));
        cmd.current_dir(self.projects_dir.path());
        cmd.env("SSPM_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("SSPM_LOG");
        cmd
    }

    /// Run a command that must succeed and parse its JSON output.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.sspm().args(args).assert().success().get_output().clone();
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Create a project dated 03/06/2022 and return its id.
    pub fn create_project(&self, title: &str) -> String {
        let result = self.json(&[
            "project",
            "create",
            "--title",
            title,
            "--user-name",
            "John Doe",
            "--user-email",
            "john.doe@example.com",
            "--user-group",
            "Group 1",
            "--date",
            "03/06/2022",
        ]);
        result["id"].as_str().unwrap().to_string()
    }

    /// The projects root.
    pub fn root(&self) -> &Path {
        self.projects_dir.path()
    }

    /// Path of the configuration file.
    pub fn config_file(&self) -> std::path::PathBuf {
        self.config_dir.path().join("sspm.ini")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
