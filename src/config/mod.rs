//! Global configuration for sspm.
//!
//! The configuration lives in `sspm.ini` inside the config directory:
//! - `$SSPM_CONFIG_DIR` when set
//! - `~/.config/sspm` otherwise
//!
//! It records where projects live (`projects.location`), where the mirror
//! data tree lives (`projects.external_data`) and how git is used. The file
//! is written with defaults on first use; it only becomes usable once
//! `projects.location` is set (see [`Config::is_valid`]).

pub mod schema;

pub use schema::{
    BOOLEAN_KEYS, CONFIG_FILE_NAME, CONFIG_SCHEMA, CONFIG_VERSION, PROJECTS_EXTERNAL_DATA,
    PROJECTS_LOCATION, PROJECTS_TEMPLATE, TOOLS_GIT_IGNORE_DATA, TOOLS_GIT_PATH, TOOLS_USE_GIT,
    format_bool, parse_bool,
};

use crate::storage::{self, IniDocument, SharedStore};
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "SSPM_CONFIG_DIR";

/// Resolve the configuration directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Other("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join("sspm"))
}

/// Handle to the global configuration store.
#[derive(Debug, Clone)]
pub struct Config {
    store: SharedStore,
    file: PathBuf,
}

impl Config {
    /// Open the configuration from the resolved config directory.
    pub fn open() -> Result<Self> {
        Self::open_in(&config_dir()?)
    }

    /// Open the configuration stored in `dir`.
    pub fn open_in(dir: &Path) -> Result<Self> {
        let file = dir.join(CONFIG_FILE_NAME);
        let store = storage::open_shared(&file, &CONFIG_SCHEMA)?;
        let file = storage::lock(&store)?.path().to_path_buf();
        Ok(Self { store, file })
    }

    /// Full path of the configuration file.
    pub fn config_file(&self) -> &Path {
        &self.file
    }

    pub fn keys(&self) -> Vec<String> {
        CONFIG_SCHEMA.keys()
    }

    pub fn get(&self, key: &str) -> Result<String> {
        storage::lock(&self.store)?.get_str(key)
    }

    /// Set a configuration value.
    ///
    /// Boolean keys only accept `True` / `False`.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = CONFIG_SCHEMA.key(key)?;
        let dotted = key.to_string();
        if BOOLEAN_KEYS.contains(&dotted.as_str()) {
            parse_bool(&IniDocument::normalize_value(value))?;
        }
        storage::lock(&self.store)?.set(&key, value)
    }

    /// All `(key, value)` pairs in schema order.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        Ok(storage::lock(&self.store)?.entries())
    }

    /// Whether the configuration is complete enough to manage projects.
    ///
    /// Creates `projects.location` if it does not exist yet.
    pub fn is_valid(&self) -> bool {
        storage::lock(&self.store)
            .map(|store| store.is_valid())
            .unwrap_or(false)
    }

    /// Fail with `NotConfigured` unless [`Config::is_valid`].
    pub fn require_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::NotConfigured)
        }
    }

    /// Back up and rewrite the default configuration.
    pub fn reset(&self) -> Result<Option<PathBuf>> {
        storage::lock(&self.store)?.reset()
    }

    /// Root of the projects tree.
    pub fn projects_location(&self) -> Result<PathBuf> {
        let location = self.get(PROJECTS_LOCATION)?;
        if location.is_empty() {
            return Err(Error::NotConfigured);
        }
        Ok(PathBuf::from(location))
    }

    /// Root of the mirror data tree, if configured.
    pub fn external_data(&self) -> Result<Option<PathBuf>> {
        let dir = self.get(PROJECTS_EXTERNAL_DATA)?;
        Ok((!dir.is_empty()).then(|| PathBuf::from(dir)))
    }

    /// Explicit git executable, if configured.
    pub fn git_path(&self) -> Result<Option<PathBuf>> {
        let path = self.get(TOOLS_GIT_PATH)?;
        Ok((!path.is_empty()).then(|| PathBuf::from(path)))
    }

    pub fn use_git(&self) -> Result<bool> {
        parse_bool(&self.get(TOOLS_USE_GIT)?)
    }

    pub fn git_ignore_data(&self) -> Result<bool> {
        parse_bool(&self.get(TOOLS_GIT_IGNORE_DATA)?)
    }
}
