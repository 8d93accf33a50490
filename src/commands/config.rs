//! `sspm config ...`

use super::{KeyList, KeyValue, Output, json};
use crate::Result;
use crate::config::Config;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigShow {
    pub config_file: PathBuf,
    pub valid: bool,
    pub entries: Vec<KeyValue>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!("Configuration file: {}", self.config_file.display())];
        if !self.valid {
            lines.push("(not configured yet: run `sspm init --location <dir>`)".to_string());
        }
        lines.extend(
            self.entries
                .iter()
                .map(|entry| format!("  {} = {}", entry.key, entry.value)),
        );
        lines.join("\n")
    }
}

impl Output for KeyValue {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.value.clone()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {}", self.key, self.value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigReset {
    pub config_file: PathBuf,
    pub backup: Option<PathBuf>,
}

impl Output for ConfigReset {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        match &self.backup {
            Some(backup) => format!(
                "Configuration reset to defaults (previous file saved as {})",
                backup.display()
            ),
            None => "Configuration reset to defaults".to_string(),
        }
    }
}

pub fn show(config: &Config) -> Result<ConfigShow> {
    let entries = config
        .entries()?
        .into_iter()
        .map(|(key, value)| KeyValue { key, value })
        .collect();
    Ok(ConfigShow {
        config_file: config.config_file().to_path_buf(),
        valid: config.is_valid(),
        entries,
    })
}

pub fn get(config: &Config, key: &str) -> Result<KeyValue> {
    Ok(KeyValue {
        key: key.to_string(),
        value: config.get(key)?,
    })
}

pub fn set(config: &Config, key: &str, value: &str) -> Result<ConfigSet> {
    config.set(key, value)?;
    Ok(ConfigSet {
        key: key.to_string(),
        value: config.get(key)?,
    })
}

pub fn keys(config: &Config) -> KeyList {
    KeyList {
        keys: config.keys(),
    }
}

pub fn reset(config: &Config) -> Result<ConfigReset> {
    let backup = config.reset()?;
    info!(config_file = %config.config_file().display(), "configuration reset");
    Ok(ConfigReset {
        config_file: config.config_file().to_path_buf(),
        backup,
    })
}
