//! Listing projects by walking `<root>/<year>/<month>/<id>`.
//!
//! The folder tree is the database: there is no index file. Anything that
//! does not look like a year (>= [`FIRST_YEAR`]) or a month (1..=12) is
//! skipped, and a project whose metadata can not be read is logged and
//! left out of the listing.

use crate::models::{CloseMode, ProjectStatus, format_date};
use crate::project::metadata::{
    self, PROJECT_END_DATE, PROJECT_START_DATE, PROJECT_STATUS, PROJECT_TITLE, ProjectMetadata,
    USER_EMAIL, USER_GROUP, USER_NAME,
};
use crate::{Error, Result};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Years before this are not project folders.
pub const FIRST_YEAR: i32 = 2021;

/// One line of a project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub year: i32,
    pub month: u32,
    pub id: String,
    pub title: String,
    pub user_name: String,
    pub user_email: String,
    pub group: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub path: PathBuf,
}

impl ProjectRecord {
    fn load(year: i32, month: u32, dir: &Path) -> Result<Self> {
        let metadata = ProjectMetadata::open(dir)?;
        Ok(Self {
            year,
            month,
            id: folder_name(dir),
            title: metadata.get(PROJECT_TITLE)?,
            user_name: metadata.get(USER_NAME)?,
            user_email: metadata.get(USER_EMAIL)?,
            group: metadata.get(USER_GROUP)?,
            status: metadata.get(PROJECT_STATUS)?,
            start_date: metadata.get(PROJECT_START_DATE)?,
            end_date: metadata.get(PROJECT_END_DATE)?,
            path: dir.to_path_buf(),
        })
    }

    /// Whether the stored status is one of the open ones.
    pub fn is_open(&self) -> bool {
        self.status
            .parse::<ProjectStatus>()
            .map(|status| status.is_open())
            .unwrap_or(false)
    }
}

/// Result of closing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedProject {
    pub path: PathBuf,
    pub end_date: String,
    pub status: ProjectStatus,
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Numeric subfolders of `dir` accepted by `accept`, in ascending order.
fn numeric_children<T, F>(dir: &Path, accept: F) -> Result<Vec<(T, PathBuf)>>
where
    T: std::str::FromStr + Ord,
    F: Fn(&T) -> bool,
{
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Ok(n) = folder_name(&path).parse::<T>() else {
            continue;
        };
        if accept(&n) {
            children.push((n, path));
        }
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}

/// Every `(year, month, project_dir)` under `root`, in tree order.
fn candidates(root: &Path) -> Result<Vec<(i32, u32, PathBuf)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for (year, year_dir) in numeric_children::<i32, _>(root, |y| *y >= FIRST_YEAR)? {
        for (month, month_dir) in numeric_children::<u32, _>(&year_dir, |m| (1..=12).contains(m))? {
            let mut projects: Vec<PathBuf> = fs::read_dir(&month_dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_dir())
                .collect();
            projects.sort();
            found.extend(projects.into_iter().map(|dir| (year, month, dir)));
        }
    }
    Ok(found)
}

/// List projects under `root`.
///
/// With `filter`, only folders whose name contains it are loaded. Folders
/// without a metadata file are skipped silently; unreadable ones with a
/// warning.
pub fn scan(root: &Path, filter: Option<&str>) -> Result<Vec<ProjectRecord>> {
    let mut records = Vec::new();
    for (year, month, dir) in candidates(root)? {
        if filter.is_some_and(|filter| !folder_name(&dir).contains(filter)) {
            continue;
        }
        if !metadata::metadata_file(&dir).is_file() {
            continue;
        }
        match ProjectRecord::load(year, month, &dir) {
            Ok(record) => records.push(record),
            Err(e) => warn!(path = %dir.display(), error = %e, "skipping unreadable project"),
        }
    }
    Ok(records)
}

/// Folder of the first project under `root` whose name contains `id`.
///
/// Pass the full folder name (`P_0007`) for an exact match.
pub fn resolve_path(root: &Path, id: &str) -> Result<PathBuf> {
    candidates(root)?
        .into_iter()
        .map(|(_, _, dir)| dir)
        .find(|dir| folder_name(dir).contains(id))
        .ok_or_else(|| Error::NotFound(format!("project {} under {}", id, root.display())))
}

/// Same lookup in the mirror data tree.
pub fn resolve_external_data_path(external_root: &Path, id: &str) -> Result<PathBuf> {
    resolve_path(external_root, id)
}

/// Most recent modification time of any file in the project, `.git` excluded.
pub fn latest_modification(project_dir: &Path) -> Result<SystemTime> {
    let mut latest: Option<SystemTime> = None;
    let walker = WalkDir::new(project_dir)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");
    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = entry.metadata().map_err(|e| Error::Io(e.into()))?.modified()?;
        if latest.is_none_or(|current| modified > current) {
            latest = Some(modified);
        }
    }
    match latest {
        Some(time) => Ok(time),
        None => Ok(fs::metadata(project_dir)?.modified()?),
    }
}

fn local_date(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}

/// Close the project at `path`.
///
/// Sets `project.end_date` from `mode`, then `project.status` to `status`.
pub fn close(path: &Path, mode: CloseMode, status: ProjectStatus) -> Result<ClosedProject> {
    if !metadata::metadata_file(path).is_file() {
        return Err(Error::NotFound(format!(
            "no project metadata in {}",
            path.display()
        )));
    }

    let end_date = match mode {
        CloseMode::Now => Local::now().date_naive(),
        CloseMode::Latest => local_date(latest_modification(path)?),
    };

    let metadata = ProjectMetadata::open(path)?;
    metadata.set_end_date(end_date)?;
    metadata.set_status(status)?;
    info!(path = %path.display(), status = %status, mode = %mode, "project closed");

    Ok(ClosedProject {
        path: path.to_path_buf(),
        end_date: format_date(end_date),
        status,
    })
}
