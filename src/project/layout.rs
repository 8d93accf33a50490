//! On-disk layout of a project: `<root>/<year>/<month>/P_<id:04>/...`.
//!
//! The month is not zero-padded (`2022/6/P_0003`). Existing trees depend on
//! this exact shape, so it must not change.

use crate::Result;
use crate::models::ProjectId;
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed children of every project folder, created on project creation.
pub const SUBFOLDERS: &[&str] = &[
    "metadata",
    "data",
    "results",
    "code/extern",
    "code/matlab",
    "code/python",
    "code/macros",
    "code/notebooks",
    "code/ilastik",
    "references",
];

/// Where a project lives under a given root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    year: i32,
    month: u32,
    id: ProjectId,
}

impl ProjectLayout {
    pub fn new(root: &Path, id: ProjectId, date: NaiveDate) -> Self {
        Self {
            root: root.to_path_buf(),
            year: date.year(),
            month: date.month(),
            id,
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<year>/<month>/P_<id>`
    pub fn project_dir(&self) -> PathBuf {
        self.root
            .join(self.year.to_string())
            .join(self.month.to_string())
            .join(self.id.folder_name())
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.project_dir().join("metadata")
    }

    pub fn code_extern_dir(&self) -> PathBuf {
        self.project_dir().join("code").join("extern")
    }

    /// Same year/month/id under another root (the external data tree).
    pub fn mirrored(&self, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..self.clone()
        }
    }

    /// Create the project folder and every fixed subfolder.
    ///
    /// Safe to call on a partially created tree: existing folders are kept.
    pub fn create_tree(&self) -> Result<()> {
        let project_dir = self.project_dir();
        fs::create_dir_all(&project_dir)?;
        for sub in SUBFOLDERS {
            fs::create_dir_all(project_dir.join(sub))?;
        }
        Ok(())
    }

    /// Create only the project folder itself (used for the mirror tree).
    pub fn create_dir(&self) -> Result<PathBuf> {
        let dir = self.project_dir();
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout(root: &Path) -> ProjectLayout {
        ProjectLayout::new(root, ProjectId(3), NaiveDate::from_ymd_opt(2022, 6, 15).unwrap())
    }

    #[test]
    fn test_project_dir_shape() {
        let layout = layout(Path::new("/projects"));
        assert_eq!(layout.project_dir(), PathBuf::from("/projects/2022/6/P_0003"));
        assert_eq!(
            layout.code_extern_dir(),
            PathBuf::from("/projects/2022/6/P_0003/code/extern")
        );
    }

    #[test]
    fn test_create_tree() {
        let temp_dir = TempDir::new().unwrap();
        let layout = layout(temp_dir.path());
        layout.create_tree().unwrap();
        for sub in SUBFOLDERS {
            assert!(layout.project_dir().join(sub).is_dir(), "{} missing", sub);
        }
    }

    #[test]
    fn test_create_tree_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let layout = layout(temp_dir.path());
        fs::create_dir_all(layout.project_dir().join("data")).unwrap();
        fs::write(layout.project_dir().join("data").join("raw.csv"), "1,2\n").unwrap();

        layout.create_tree().unwrap();
        layout.create_tree().unwrap();
        assert_eq!(
            fs::read_to_string(layout.project_dir().join("data/raw.csv")).unwrap(),
            "1,2\n"
        );
        assert!(layout.project_dir().join("code/ilastik").is_dir());
    }

    #[test]
    fn test_mirrored_layout() {
        let temp_dir = TempDir::new().unwrap();
        let mirror = layout(Path::new("/projects")).mirrored(temp_dir.path());
        let dir = mirror.create_dir().unwrap();
        assert_eq!(dir, temp_dir.path().join("2022").join("6").join("P_0003"));
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }
}
