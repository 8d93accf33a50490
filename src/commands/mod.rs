//! Command implementations for the sspm CLI.
//!
//! Every command returns a serializable result that `main` prints either as
//! JSON (default) or as human-readable text (`-H`). Commands are organized
//! by surface:
//! - `system` - `version` and `init`
//! - `config` - global configuration
//! - `project` - project creation, metadata, listing, closing, opening
//! - `stats` - aggregated counts

pub mod config;
pub mod project;
pub mod stats;
pub mod system;

use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// JSON encoding shared by the `Output` impls.
pub(crate) fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// A list of valid keys (`config keys`, `project keys`).
#[derive(Debug, Clone, Serialize)]
pub struct KeyList {
    pub keys: Vec<String>,
}

impl Output for KeyList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.keys.join("\n")
    }
}

/// One `key = value` pair.
#[derive(Debug, Clone, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}
