//! Git integration for new projects.
//!
//! Git is optional: the executable comes from `tools.git_path` or is looked
//! up on `PATH`, and when neither works git initialisation is skipped.
//! Every invocation runs inside the project folder with a timeout, and with
//! the project owner as commit identity so no global git setup is needed.

use crate::{Error, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Upper bound for a single git invocation.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(60);

pub const IGNORE_FILE_NAME: &str = ".gitignore";

const IGNORE_PATTERNS: &[&str] = &[
    ".ipynb_checkpoints/",
    "__pycache__/",
    ".pytest_cache/",
    "*.egg-info/",
    ".vscode/",
    ".idea/",
];

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial import.";
pub const EXTERN_COMMIT_MESSAGE: &str = "Add external repositories.";

/// An external repository linked into `code/extern` as a submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternRepo {
    pub name: String,
    pub url: String,
}

/// Parse `"name_1|url_1;name_2|url_2"`.
///
/// Malformed entries are skipped with a warning.
pub fn parse_extern_repos(list: &str) -> Vec<ExternRepo> {
    let mut repos = Vec::new();
    for entry in list.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
        match parts.as_slice() {
            [name, url] if !name.is_empty() && !url.is_empty() => repos.push(ExternRepo {
                name: name.to_string(),
                url: url.to_string(),
            }),
            _ => warn!(entry, "malformed external repository entry, skipping"),
        }
    }
    repos
}

/// Write the default ignore file unless one exists already.
///
/// Returns whether a file was written.
pub fn write_ignore_file(project_dir: &Path, ignore_data: bool) -> Result<bool> {
    let path = project_dir.join(IGNORE_FILE_NAME);
    if path.is_file() {
        return Ok(false);
    }

    let mut contents = String::new();
    if ignore_data {
        contents.push_str("/data/\n");
    }
    for pattern in IGNORE_PATTERNS {
        contents.push_str(pattern);
        contents.push('\n');
    }
    fs::write(&path, contents)?;
    Ok(true)
}

/// A resolved git executable.
#[derive(Debug, Clone)]
pub struct Git {
    exe: PathBuf,
    identity: Option<(String, String)>,
}

impl Git {
    /// Resolve the git executable.
    ///
    /// An explicit path must name an existing file; otherwise `PATH` is
    /// searched. `None` means git is unavailable.
    pub fn resolve(explicit: Option<&Path>) -> Option<Self> {
        let exe = match explicit {
            Some(path) if path.is_file() => path.to_path_buf(),
            Some(path) => {
                warn!(path = %path.display(), "configured git executable does not exist");
                return None;
            }
            None => which::which("git").ok()?,
        };
        Some(Self {
            exe,
            identity: None,
        })
    }

    /// Commit as `name <email>`.
    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        self.identity = Some((name.to_string(), email.to_string()));
        self
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// `git init` plus repository-local settings.
    pub fn init_repository(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["init"], &[])?;
        self.run(dir, &["config", "core.autocrlf", "false"], &[])
    }

    /// Stage everything and commit.
    pub fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        self.run(dir, &["add", "."], &[])?;
        self.run(dir, &["commit", "-m", message], &[])
    }

    /// `git submodule add <url> <name>` run from `extern_dir`.
    pub fn add_submodule(&self, extern_dir: &Path, repo: &ExternRepo) -> Result<()> {
        self.run(
            extern_dir,
            &["submodule", "add", &repo.url, &repo.name],
            &["protocol.file.allow=always"],
        )
    }

    /// Stage `.gitmodules` and commit.
    pub fn commit_submodules(&self, dir: &Path, message: &str) -> Result<()> {
        self.run(dir, &["add", ".gitmodules"], &[])?;
        self.run(dir, &["commit", "-m", message], &[])
    }

    fn run(&self, dir: &Path, args: &[&str], settings: &[&str]) -> Result<()> {
        let mut cmd = Command::new(&self.exe);
        if let Some((name, email)) = &self.identity {
            cmd.arg("-c").arg(format!("user.name={}", name));
            cmd.arg("-c").arg(format!("user.email={}", email));
        }
        for setting in settings {
            cmd.arg("-c").arg(setting);
        }
        cmd.args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let shown = format!("git {}", args.join(" "));
        debug!(command = %shown, dir = %dir.display(), "running git");

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::Vcs(format!("failed to run {}: {}", self.exe.display(), e)))?;

        // Drain stderr while waiting so a chatty git can not fill the pipe
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });
        let collect_stderr = move || {
            stderr_reader
                .and_then(|handle| handle.join().ok())
                .unwrap_or_default()
        };

        let status = match child.wait_timeout(GIT_TIMEOUT)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Vcs(format!(
                    "{} timed out after {}s",
                    shown,
                    GIT_TIMEOUT.as_secs()
                )));
            }
        };

        let stderr = collect_stderr();
        if !status.success() {
            return Err(Error::Vcs(format!("{} failed: {}", shown, stderr.trim())));
        }
        Ok(())
    }
}
