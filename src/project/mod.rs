//! Project folders: creation, metadata, listing and git setup.
//!
//! - `layout` - where a project lives and its fixed subtree
//! - `metadata` - the per-project `metadata.ini` record
//! - `scanner` - listing, lookup and closing
//! - `vcs` - optional git repository per project

pub mod layout;
pub mod metadata;
pub mod scanner;
pub mod vcs;

pub use layout::{ProjectLayout, SUBFOLDERS};
pub use metadata::{InitialMetadata, ProjectMetadata};
pub use scanner::{ClosedProject, ProjectRecord, close, resolve_external_data_path, resolve_path, scan};
pub use vcs::{ExternRepo, Git, parse_extern_repos};

use crate::models::ProjectId;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything needed to create one project.
#[derive(Debug, Clone)]
pub struct NewProject<'a> {
    pub id: ProjectId,
    pub date: NaiveDate,
    pub title: &'a str,
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub user_group: &'a str,
    pub description: &'a str,
    /// Root of the mirror data tree
    pub external_data_root: Option<&'a Path>,
    pub use_git: bool,
    pub git_path: Option<&'a Path>,
    pub git_ignore_data: bool,
    pub extern_repos: Vec<ExternRepo>,
}

/// A freshly created project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectHandle {
    pub id: String,
    pub path: PathBuf,
    pub external_data_path: Option<PathBuf>,
    pub git_initialized: bool,
}

/// Create a project under `root`.
///
/// Fails with `AlreadyExists` if the target folder is present; nothing is
/// touched in that case. Later steps are not rolled back: a failure after
/// the tree was created leaves a partial project behind. Git problems are
/// only logged and reported through [`ProjectHandle::git_initialized`].
pub fn create(root: &Path, new: &NewProject<'_>) -> Result<ProjectHandle> {
    fs::create_dir_all(root)?;

    let layout = ProjectLayout::new(root, new.id, new.date);
    let project_dir = layout.project_dir();
    if project_dir.exists() {
        warn!(path = %project_dir.display(), "project folder already exists");
        return Err(Error::AlreadyExists(project_dir));
    }

    layout.create_tree()?;

    let metadata = ProjectMetadata::open(&project_dir)?;
    metadata.write_initial(&InitialMetadata {
        title: new.title,
        start_date: new.date,
        description: new.description,
        user_name: new.user_name,
        user_email: new.user_email,
        user_group: new.user_group,
    })?;
    write_description(&layout.metadata_dir(), new.description)?;

    let external_data_path = match new.external_data_root {
        Some(external_root) => Some(layout.mirrored(external_root).create_dir()?),
        None => None,
    };

    let git_initialized = new.use_git && init_git(&layout, new);

    info!(
        id = %new.id,
        path = %project_dir.display(),
        git = git_initialized,
        "project created"
    );

    Ok(ProjectHandle {
        id: new.id.folder_name(),
        path: project_dir,
        external_data_path,
        git_initialized,
    })
}

fn write_description(metadata_dir: &Path, description: &str) -> Result<()> {
    let path = metadata_dir.join(metadata::DESCRIPTION_FILE_NAME);
    if !path.exists() {
        fs::write(&path, description)?;
    }
    Ok(())
}

/// Run the git sequence; `false` when git is unavailable or a step failed.
fn init_git(layout: &ProjectLayout, new: &NewProject<'_>) -> bool {
    let Some(git) = Git::resolve(new.git_path) else {
        warn!("git requested but no git executable was found");
        return false;
    };
    let git = git.with_identity(new.user_name, new.user_email);
    let project_dir = layout.project_dir();

    let result = (|| -> Result<()> {
        git.init_repository(&project_dir)?;
        vcs::write_ignore_file(&project_dir, new.git_ignore_data)?;
        git.commit_all(&project_dir, vcs::INITIAL_COMMIT_MESSAGE)?;

        if new.extern_repos.is_empty() {
            return Ok(());
        }
        let extern_dir = layout.code_extern_dir();
        for repo in &new.extern_repos {
            git.add_submodule(&extern_dir, repo)?;
        }
        git.commit_submodules(&project_dir, vcs::EXTERN_COMMIT_MESSAGE)
    })();

    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %project_dir.display(), error = %e, "git initialisation failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;
    use tempfile::TempDir;

    fn new_project(id: u32) -> NewProject<'static> {
        NewProject {
            id: ProjectId(id),
            date: NaiveDate::from_ymd_opt(2022, 6, 3).unwrap(),
            title: "Project A",
            user_name: "John Doe",
            user_email: "john.doe@example.com",
            user_group: "Group 1",
            description: "Segmentation of nuclei.",
            external_data_root: None,
            use_git: false,
            git_path: None,
            git_ignore_data: true,
            extern_repos: Vec::new(),
        }
    }

    #[test]
    fn test_create_project() {
        let temp_dir = TempDir::new().unwrap();
        let handle = create(temp_dir.path(), &new_project(0)).unwrap();

        assert_eq!(handle.id, "P_0000");
        assert_eq!(handle.path, temp_dir.path().join("2022/6/P_0000"));
        assert!(!handle.git_initialized);
        for sub in SUBFOLDERS {
            assert!(handle.path.join(sub).is_dir());
        }
        assert_eq!(
            fs::read_to_string(handle.path.join("metadata/description.md")).unwrap(),
            "Segmentation of nuclei."
        );

        let records = scan(temp_dir.path(), None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, ProjectStatus::New.as_str());
        assert_eq!(records[0].end_date, "");
    }

    #[test]
    fn test_create_existing_project_fails() {
        let temp_dir = TempDir::new().unwrap();
        create(temp_dir.path(), &new_project(0)).unwrap();
        let metadata_before =
            fs::read_to_string(metadata::metadata_file(&temp_dir.path().join("2022/6/P_0000")))
                .unwrap();

        let mut again = new_project(0);
        again.title = "Other";
        match create(temp_dir.path(), &again) {
            Err(Error::AlreadyExists(path)) => {
                assert_eq!(path, temp_dir.path().join("2022/6/P_0000"))
            }
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
        let metadata_after =
            fs::read_to_string(metadata::metadata_file(&temp_dir.path().join("2022/6/P_0000")))
                .unwrap();
        assert_eq!(metadata_before, metadata_after);
    }

    #[test]
    fn test_create_with_external_data() {
        let temp_dir = TempDir::new().unwrap();
        let external = TempDir::new().unwrap();
        let mut new = new_project(4);
        new.external_data_root = Some(external.path());

        let handle = create(temp_dir.path(), &new).unwrap();
        let mirror = handle.external_data_path.unwrap();
        assert_eq!(mirror, external.path().join("2022/6/P_0004"));
        assert!(mirror.is_dir());
    }

    #[test]
    fn test_create_with_missing_git_executable() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("bin/git");
        let mut new = new_project(1);
        new.use_git = true;
        new.git_path = Some(&missing);

        let handle = create(&temp_dir.path().join("root"), &new).unwrap();
        assert!(!handle.git_initialized);
        assert!(!handle.path.join(".git").exists());
    }

    #[test]
    fn test_create_with_git() {
        if which::which("git").is_err() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let mut new = new_project(2);
        new.use_git = true;

        let handle = create(temp_dir.path(), &new).unwrap();
        assert!(handle.git_initialized);
        assert!(handle.path.join(".git").is_dir());
        let ignore = fs::read_to_string(handle.path.join(".gitignore")).unwrap();
        assert!(ignore.starts_with("/data/"));
    }

    #[test]
    fn test_create_with_submodule() {
        if which::which("git").is_err() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        let upstream = temp_dir.path().join("upstream");
        fs::create_dir_all(&upstream).unwrap();
        fs::write(upstream.join("lib.py"), "x = 1\n").unwrap();
        let git = Git::resolve(None)
            .unwrap()
            .with_identity("John Doe", "john.doe@example.com");
        git.init_repository(&upstream).unwrap();
        git.commit_all(&upstream, "lib").unwrap();

        let mut new = new_project(3);
        new.use_git = true;
        new.extern_repos = vec![ExternRepo {
            name: "lib".to_string(),
            url: upstream.to_string_lossy().into_owned(),
        }];

        let handle = create(&temp_dir.path().join("root"), &new).unwrap();
        assert!(handle.git_initialized);
        assert!(handle.path.join(".gitmodules").is_file());
        assert!(handle.path.join("code/extern/lib/lib.py").is_file());
    }
}
