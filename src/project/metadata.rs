//! Per-project metadata (`<project>/metadata/metadata.ini`).
//!
//! ```ini
//! [metadata]
//! version = 1
//!
//! [project]
//! title = Project A
//! start_date = 03/06/2022
//! end_date =
//! status = new
//! description =
//!
//! [user]
//! name = John Doe
//! email = john.doe@example.com
//! group = Group 1
//! collaborators =
//! ```

use crate::models::{ProjectStatus, format_date, parse_date};
use crate::storage::{self, IniDocument, Schema, SchemaEntry, SharedStore, StoreKey};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Current metadata schema revision.
pub const METADATA_VERSION: &str = "1";

/// Folder (inside the project) holding the metadata files.
pub const METADATA_DIR: &str = "metadata";
pub const METADATA_FILE_NAME: &str = "metadata.ini";
pub const DESCRIPTION_FILE_NAME: &str = "description.md";

pub const PROJECT_TITLE: &str = "project.title";
pub const PROJECT_START_DATE: &str = "project.start_date";
pub const PROJECT_END_DATE: &str = "project.end_date";
pub const PROJECT_STATUS: &str = "project.status";
pub const PROJECT_DESCRIPTION: &str = "project.description";
pub const USER_NAME: &str = "user.name";
pub const USER_EMAIL: &str = "user.email";
pub const USER_GROUP: &str = "user.group";
pub const USER_COLLABORATORS: &str = "user.collaborators";
pub const METADATA_VERSION_KEY: &str = "metadata.version";

pub static METADATA_SCHEMA: Schema = Schema {
    name: "metadata",
    version: METADATA_VERSION,
    entries: &[
        SchemaEntry::new("metadata", "version", METADATA_VERSION),
        SchemaEntry::new("project", "title", "").mandatory(),
        SchemaEntry::new("project", "start_date", ""),
        SchemaEntry::new("project", "end_date", ""),
        SchemaEntry::new("project", "status", ""),
        SchemaEntry::new("project", "description", ""),
        SchemaEntry::new("user", "name", "").mandatory(),
        SchemaEntry::new("user", "email", "").mandatory(),
        SchemaEntry::new("user", "group", "").mandatory(),
        SchemaEntry::new("user", "collaborators", ""),
    ],
};

/// Path of the metadata file of the project at `project_dir`.
pub fn metadata_file(project_dir: &Path) -> PathBuf {
    project_dir.join(METADATA_DIR).join(METADATA_FILE_NAME)
}

/// Values written when a project is created.
#[derive(Debug, Clone)]
pub struct InitialMetadata<'a> {
    pub title: &'a str,
    pub start_date: NaiveDate,
    pub description: &'a str,
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub user_group: &'a str,
}

/// Metadata record of one project.
#[derive(Debug, Clone)]
pub struct ProjectMetadata {
    store: SharedStore,
    file: PathBuf,
}

impl ProjectMetadata {
    /// Open the metadata of the project at `project_dir`.
    ///
    /// A default (not yet valid) file is written if none exists.
    pub fn open(project_dir: &Path) -> Result<Self> {
        let store = storage::open_shared(&metadata_file(project_dir), &METADATA_SCHEMA)?;
        let file = storage::lock(&store)?.path().to_path_buf();
        Ok(Self { store, file })
    }

    pub fn metadata_file(&self) -> &Path {
        &self.file
    }

    pub fn keys(&self) -> Vec<String> {
        METADATA_SCHEMA.keys()
    }

    /// Whether `key` may hold an empty string.
    ///
    /// The identity fields (title, user name, e-mail and group) must stay
    /// non-empty, and `project.status` must hold a known status.
    pub fn can_be_empty(key: &str) -> Result<bool> {
        let key = METADATA_SCHEMA.key(key)?;
        Ok(!key.entry().mandatory && key.to_string() != PROJECT_STATUS)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        storage::lock(&self.store)?.get_str(key)
    }

    /// Set a metadata value after validating it.
    ///
    /// - undeclared keys fail with `UnknownKey`
    /// - empty values for identity fields fail with `EmptyNotAllowed`
    /// - `project.status` must be a known status (`InvalidEnum`)
    /// - dates must be `dd/mm/yyyy` when non-empty (`InvalidArgument`)
    /// - `metadata.version` is read-only
    ///
    /// Nothing is written when validation fails.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = METADATA_SCHEMA.key(key)?;
        let value = validate(&key, &IniDocument::normalize_value(value))?;
        storage::lock(&self.store)?.set(&key, &value)
    }

    pub fn set_status(&self, status: ProjectStatus) -> Result<()> {
        self.set(PROJECT_STATUS, status.as_str())
    }

    pub fn set_end_date(&self, date: NaiveDate) -> Result<()> {
        self.set(PROJECT_END_DATE, &format_date(date))
    }

    /// Stored status; `InvalidEnum` if the file holds an unknown value.
    pub fn status(&self) -> Result<ProjectStatus> {
        self.get(PROJECT_STATUS)?.parse()
    }

    pub fn title(&self) -> Result<String> {
        self.get(PROJECT_TITLE)
    }

    /// Write the record of a freshly created project.
    pub fn write_initial(&self, initial: &InitialMetadata<'_>) -> Result<()> {
        self.set(PROJECT_TITLE, initial.title)?;
        self.set(PROJECT_START_DATE, &format_date(initial.start_date))?;
        self.set(PROJECT_END_DATE, "")?;
        self.set_status(ProjectStatus::New)?;
        self.set(PROJECT_DESCRIPTION, initial.description)?;
        self.set(USER_NAME, initial.user_name)?;
        self.set(USER_EMAIL, initial.user_email)?;
        self.set(USER_GROUP, initial.user_group)?;
        self.set(USER_COLLABORATORS, "")
    }

    /// All `(key, value)` pairs in schema order.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        Ok(storage::lock(&self.store)?.entries())
    }

    /// Version matches and identity fields are set.
    pub fn is_valid(&self) -> bool {
        storage::lock(&self.store)
            .map(|store| store.is_valid())
            .unwrap_or(false)
    }
}

fn validate(key: &StoreKey, value: &str) -> Result<String> {
    let dotted = key.to_string();
    if dotted == METADATA_VERSION_KEY {
        return Err(Error::InvalidArgument(
            "metadata.version is managed by sspm and can not be set".to_string(),
        ));
    }
    if value.is_empty() && key.entry().mandatory {
        return Err(Error::EmptyNotAllowed(dotted));
    }

    match dotted.as_str() {
        PROJECT_STATUS => Ok(value.parse::<ProjectStatus>()?.as_str().to_string()),
        PROJECT_START_DATE | PROJECT_END_DATE if !value.is_empty() => {
            Ok(format_date(parse_date(value)?))
        }
        _ => Ok(value.to_string()),
    }
}
