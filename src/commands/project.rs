//! `sspm project ...`

use super::{KeyList, Output, json};
use crate::config::Config;
use crate::models::{CloseMode, ProjectId, ProjectStatus, parse_date};
use crate::project::metadata::{
    METADATA_SCHEMA, PROJECT_TITLE, USER_EMAIL, USER_GROUP, USER_NAME, metadata_file,
};
use crate::project::{self, NewProject, ProjectHandle, ProjectMetadata, ProjectRecord};
use crate::registry::GlobalRegistry;
use crate::{Error, Result};
use chrono::Local;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use tracing::debug;

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// `something@domain.tld`, nothing stricter.
fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Map a user-supplied id to the folder-name fragment to look for.
///
/// Numeric ids (`7`, `P_7`) become the full folder name so `7` does not
/// match `P_0017`; anything else is used as a substring.
fn id_needle(id: &str) -> String {
    id.parse::<ProjectId>()
        .map(|id| id.folder_name())
        .unwrap_or_else(|_| id.to_string())
}

fn projects_root(config: &Config) -> Result<PathBuf> {
    config.require_valid()?;
    config.projects_location()
}

fn project_path(config: &Config, id: &str) -> Result<PathBuf> {
    project::resolve_path(&projects_root(config)?, &id_needle(id))
}

/// Arguments of `project create`.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs<'a> {
    pub title: &'a str,
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub user_group: &'a str,
    pub short_descr: &'a str,
    pub extern_git_repos: &'a str,
    /// `dd/mm/yyyy`; today when absent
    pub date: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectCreated {
    pub title: String,
    #[serde(flatten)]
    pub handle: ProjectHandle,
}

impl Output for ProjectCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Created project {}: {}",
            self.handle.id, self.title
        )];
        lines.push(format!("  path: {}", self.handle.path.display()));
        if let Some(external) = &self.handle.external_data_path {
            lines.push(format!("  external data: {}", external.display()));
        }
        if self.handle.git_initialized {
            lines.push("  git repository initialised".to_string());
        }
        lines.join("\n")
    }
}

/// Create the next project in the configured root.
///
/// The id counter only advances once the project folder exists.
pub fn create(config: &Config, args: &CreateArgs<'_>) -> Result<ProjectCreated> {
    for (key, value) in [
        (PROJECT_TITLE, args.title),
        (USER_NAME, args.user_name),
        (USER_EMAIL, args.user_email),
        (USER_GROUP, args.user_group),
    ] {
        if value.trim().is_empty() {
            return Err(Error::EmptyNotAllowed(key.to_string()));
        }
    }
    if !is_valid_email(args.user_email) {
        return Err(Error::InvalidArgument(format!(
            "'{}' is not a valid e-mail address",
            args.user_email
        )));
    }
    let date = match args.date {
        Some(date) => parse_date(date)?,
        None => Local::now().date_naive(),
    };

    let root = projects_root(config)?;
    let external_data = config.external_data()?;
    let git_path = config.git_path()?;

    let registry = GlobalRegistry::new(&root);
    let id = ProjectId(registry.next_id()?);

    let handle = project::create(
        &root,
        &NewProject {
            id,
            date,
            title: args.title,
            user_name: args.user_name,
            user_email: args.user_email,
            user_group: args.user_group,
            description: args.short_descr,
            external_data_root: external_data.as_deref(),
            use_git: config.use_git()?,
            git_path: git_path.as_deref(),
            git_ignore_data: config.git_ignore_data()?,
            extern_repos: project::parse_extern_repos(args.extern_git_repos),
        },
    )?;
    registry.advance()?;

    Ok(ProjectCreated {
        title: args.title.to_string(),
        handle,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectList {
    pub count: usize,
    pub projects: Vec<ProjectRecord>,
}

impl Output for ProjectList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects found.".to_string();
        }
        let mut lines = vec![format!("{} project(s):", self.count)];
        for p in &self.projects {
            let end = if p.end_date.is_empty() {
                String::new()
            } else {
                format!(" -> {}", p.end_date)
            };
            lines.push(format!(
                "  {} {}/{:<2} [{}] {} ({}, {}) {}{}",
                p.id, p.year, p.month, p.status, p.title, p.user_name, p.group, p.start_date, end
            ));
        }
        lines.join("\n")
    }
}

pub fn list(config: &Config, filter: Option<&str>) -> Result<ProjectList> {
    let projects = project::scan(&projects_root(config)?, filter)?;
    Ok(ProjectList {
        count: projects.len(),
        projects,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectValue {
    pub id: String,
    pub key: String,
    pub value: String,
}

impl Output for ProjectValue {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.value.clone()
    }
}

fn folder_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Metadata of an existing project; never creates a default file.
fn open_metadata(path: &Path) -> Result<ProjectMetadata> {
    if !metadata_file(path).is_file() {
        return Err(Error::NotFound(format!(
            "no project metadata in {}",
            path.display()
        )));
    }
    ProjectMetadata::open(path)
}

pub fn get(config: &Config, id: &str, key: &str) -> Result<ProjectValue> {
    let path = project_path(config, id)?;
    let value = open_metadata(&path)?.get(key)?;
    Ok(ProjectValue {
        id: folder_id(&path),
        key: key.to_string(),
        value,
    })
}

/// Set a metadata value; the returned value is the stored (normalised) one.
pub fn set(config: &Config, id: &str, key: &str, value: &str) -> Result<ProjectValue> {
    let path = project_path(config, id)?;
    let metadata = open_metadata(&path)?;
    metadata.set(key, value)?;
    Ok(ProjectValue {
        id: folder_id(&path),
        key: key.to_string(),
        value: metadata.get(key)?,
    })
}

pub fn keys() -> KeyList {
    KeyList {
        keys: METADATA_SCHEMA.keys(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectClosed {
    pub id: String,
    pub path: PathBuf,
    pub end_date: String,
    pub status: ProjectStatus,
}

impl Output for ProjectClosed {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Closed project {} on {} with status '{}'",
            self.id, self.end_date, self.status
        )
    }
}

/// Close a project. Mode and status are validated before anything is written.
pub fn close(config: &Config, id: &str, mode: &str, status: Option<&str>) -> Result<ProjectClosed> {
    let mode: CloseMode = mode.parse()?;
    let status = match status {
        Some(status) => status.parse()?,
        None => ProjectStatus::DEFAULT_CLOSED,
    };
    let path = project_path(config, id)?;
    let closed = project::close(&path, mode, status)?;
    Ok(ProjectClosed {
        id: folder_id(&path),
        path: closed.path,
        end_date: closed.end_date,
        status: closed.status,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenResult {
    pub path: PathBuf,
    pub launched: bool,
}

impl Output for OpenResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.launched {
            format!("Opened {}", self.path.display())
        } else {
            self.path.display().to_string()
        }
    }
}

/// Platform file explorer.
fn explorer() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Open a project folder (or the root) in the file explorer.
///
/// With `external`, the mirror data tree is used instead of the projects tree.
pub fn open(config: &Config, id: Option<&str>, external: bool, dry_run: bool) -> Result<OpenResult> {
    let root = if external {
        config.require_valid()?;
        config.external_data()?.ok_or_else(|| {
            Error::InvalidArgument("projects.external_data is not configured".to_string())
        })?
    } else {
        projects_root(config)?
    };

    let path = match id {
        Some(id) if external => project::resolve_external_data_path(&root, &id_needle(id))?,
        Some(id) => project::resolve_path(&root, &id_needle(id))?,
        None => root,
    };

    if dry_run {
        return Ok(OpenResult {
            path,
            launched: false,
        });
    }

    let program = explorer();
    debug!(program, path = %path.display(), "launching file explorer");
    Command::new(program)
        .arg(&path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::Other(format!("failed to launch {}: {}", program, e)))?;

    Ok(OpenResult {
        path,
        launched: true,
    })
}
