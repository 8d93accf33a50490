//! `sspm version` and `sspm init`.

use super::{Output, json};
use crate::Result;
use crate::config::{Config, PROJECTS_EXTERNAL_DATA, PROJECTS_LOCATION};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Build commit, injected by `build.rs`.
pub const GIT_COMMIT: &str = env!("SSPM_GIT_COMMIT");
/// Build timestamp, injected by `build.rs`.
pub const BUILD_TIMESTAMP: &str = env!("SSPM_BUILD_TIMESTAMP");

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub commit: String,
    pub built: String,
}

impl Output for VersionInfo {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "{} {} ({} built {})",
            self.name, self.version, self.commit, self.built
        )
    }
}

pub fn version() -> VersionInfo {
    VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: GIT_COMMIT.to_string(),
        built: BUILD_TIMESTAMP.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitResult {
    pub config_file: PathBuf,
    pub location: PathBuf,
    pub external_data: Option<PathBuf>,
}

impl Output for InitResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Configuration written to {}", self.config_file.display()),
            format!("  projects.location: {}", self.location.display()),
        ];
        if let Some(external) = &self.external_data {
            lines.push(format!("  projects.external_data: {}", external.display()));
        }
        lines.join("\n")
    }
}

/// Create `dir` and return its absolute form.
fn prepare_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(fs::canonicalize(dir)?)
}

/// Point the configuration at a projects root (and optional mirror tree).
pub fn init(config: &Config, location: &Path, external_data: Option<&Path>) -> Result<InitResult> {
    let location = prepare_dir(location)?;
    config.set(PROJECTS_LOCATION, &location.to_string_lossy())?;

    let external_data = external_data.map(prepare_dir).transpose()?;
    if let Some(external) = &external_data {
        config.set(PROJECTS_EXTERNAL_DATA, &external.to_string_lossy())?;
    }
    config.require_valid()?;
    info!(location = %location.display(), "sspm initialised");

    Ok(InitResult {
        config_file: config.config_file().to_path_buf(),
        location,
        external_data,
    })
}
