//! Schema of the global configuration file (`sspm.ini`).
//!
//! ```ini
//! [metadata]
//! version = 0
//!
//! [projects]
//! location = /data/projects
//! external_data =
//! template =
//!
//! [tools]
//! git_path =
//! use_git = True
//! git_ignore_data = True
//! ```

use crate::storage::{Schema, SchemaEntry};
use crate::{Error, Result};

/// Current configuration schema revision.
pub const CONFIG_VERSION: &str = "0";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "sspm.ini";

pub const PROJECTS_LOCATION: &str = "projects.location";
pub const PROJECTS_EXTERNAL_DATA: &str = "projects.external_data";
pub const PROJECTS_TEMPLATE: &str = "projects.template";
pub const TOOLS_GIT_PATH: &str = "tools.git_path";
pub const TOOLS_USE_GIT: &str = "tools.use_git";
pub const TOOLS_GIT_IGNORE_DATA: &str = "tools.git_ignore_data";

/// Keys whose values must be the literals `True` or `False`.
pub const BOOLEAN_KEYS: &[&str] = &[TOOLS_USE_GIT, TOOLS_GIT_IGNORE_DATA];

pub static CONFIG_SCHEMA: Schema = Schema {
    name: "configuration",
    version: CONFIG_VERSION,
    entries: &[
        SchemaEntry::new("metadata", "version", CONFIG_VERSION),
        SchemaEntry::new("projects", "location", "")
            .mandatory()
            .directory(),
        SchemaEntry::new("projects", "external_data", ""),
        SchemaEntry::new("projects", "template", ""),
        SchemaEntry::new("tools", "git_path", ""),
        SchemaEntry::new("tools", "use_git", "True"),
        SchemaEntry::new("tools", "git_ignore_data", "True"),
    ],
};

/// Render a boolean the way the configuration file stores it.
pub fn format_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Parse a stored boolean literal.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(Error::InvalidEnum {
            value: other.to_string(),
            expected: "True, False".to_string(),
        }),
    }
}
