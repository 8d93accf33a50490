//! Data models for sspm.
//!
//! - `ProjectStatus` - lifecycle state of a project, classified open/closed
//! - `ProjectId` - sequence number rendered as the `P_NNNN` folder name
//! - `CloseMode` - how `close` picks the end date
//! - date helpers for the `dd/mm/yyyy` format used in metadata files

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Date format stored in metadata files.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        Error::InvalidArgument(format!("'{}' is not a date in dd/mm/yyyy format", s))
    })
}

/// Project status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    #[default]
    New,
    Feedback,
    InProgress,
    WaitingForData,
    OnHold,
    Superseded,
    Dropped,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 8] = [
        ProjectStatus::New,
        ProjectStatus::Feedback,
        ProjectStatus::InProgress,
        ProjectStatus::WaitingForData,
        ProjectStatus::OnHold,
        ProjectStatus::Superseded,
        ProjectStatus::Dropped,
        ProjectStatus::Completed,
    ];

    /// Status `close` applies when none is requested.
    pub const DEFAULT_CLOSED: ProjectStatus = ProjectStatus::Completed;

    /// Spelling stored in metadata files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::New => "new",
            ProjectStatus::Feedback => "feedback",
            ProjectStatus::InProgress => "in progress",
            ProjectStatus::WaitingForData => "waiting for data",
            ProjectStatus::OnHold => "on hold",
            ProjectStatus::Superseded => "superseded",
            ProjectStatus::Dropped => "dropped",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Work on the project is not finished yet.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ProjectStatus::New
                | ProjectStatus::Feedback
                | ProjectStatus::InProgress
                | ProjectStatus::WaitingForData
                | ProjectStatus::OnHold
        )
    }

    /// Comma-separated list of accepted spellings, for error messages.
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    /// Case-insensitive; `_` and `-` are accepted in place of spaces.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| Error::InvalidEnum {
                value: s.to_string(),
                expected: Self::expected(),
            })
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Sequence number of a project; its folder is `P_<id:04>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(pub u32);

impl ProjectId {
    pub const PREFIX: &'static str = "P_";

    /// Folder name, e.g. `P_0007`.
    pub fn folder_name(&self) -> String {
        format!("{}{:04}", Self::PREFIX, self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.folder_name())
    }
}

impl FromStr for ProjectId {
    type Err = Error;

    /// Accepts `P_0007` or a bare `7`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().strip_prefix(Self::PREFIX).unwrap_or(s.trim());
        digits
            .parse::<u32>()
            .map(ProjectId)
            .map_err(|_| Error::InvalidArgument(format!("'{}' is not a project id", s)))
    }
}

/// How `close` determines the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Today
    Now,
    /// Date of the most recent file modification in the project
    Latest,
}

impl CloseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseMode::Now => "now",
            CloseMode::Latest => "latest",
        }
    }
}

impl FromStr for CloseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "now" => Ok(CloseMode::Now),
            "latest" => Ok(CloseMode::Latest),
            other => Err(Error::InvalidArgument(format!(
                "close mode must be one of \"now\" or \"latest\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for CloseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
