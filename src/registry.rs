//! Project id allocation for a projects root.
//!
//! The last allocated id lives in `<root>/.projects` as a single line
//! `last_id=<integer>`. A fresh root starts at `-1`, so the first project is
//! `P_0000`.
//!
//! Allocation is two-step: [`GlobalRegistry::next_id`] only previews the id,
//! [`GlobalRegistry::advance`] commits it. The pair is not atomic; the
//! counter file itself is always replaced atomically.

use crate::storage::write_atomic;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the counter file at the root of the projects location.
pub const REGISTRY_FILE: &str = ".projects";

const LAST_ID_PREFIX: &str = "last_id=";

/// Counter of allocated project ids under one root.
#[derive(Debug, Clone)]
pub struct GlobalRegistry {
    root: PathBuf,
}

impl GlobalRegistry {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Path of the counter file.
    pub fn file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    /// Read the last allocated id, initialising the file to `-1` if missing.
    pub fn last_id(&self) -> Result<i64> {
        let path = self.file();
        if !path.is_file() {
            debug!(path = %path.display(), "initialising project registry");
            self.write(-1)?;
        }

        let text = fs::read_to_string(&path)?;
        parse_last_id(&text).ok_or_else(|| Error::CorruptFormat {
            path: path.clone(),
            reason: format!("expected a single line 'last_id=<int>', got '{}'", text.trim()),
        })
    }

    /// The id the next project would get. Does not persist anything.
    pub fn next_id(&self) -> Result<u32> {
        let last = self.last_id()?;
        let next = last.checked_add(1).and_then(|next| u32::try_from(next).ok());
        next.ok_or_else(|| Error::CorruptFormat {
            path: self.file(),
            reason: format!("last_id {} is out of range", last),
        })
    }

    /// Recompute the next id and persist it as the new `last_id`.
    pub fn advance(&self) -> Result<u32> {
        let id = self.next_id()?;
        self.write(i64::from(id))?;
        info!(root = %self.root.display(), last_id = id, "advanced project registry");
        Ok(id)
    }

    fn write(&self, last_id: i64) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        write_atomic(&self.file(), &format!("{}{}\n", LAST_ID_PREFIX, last_id))
    }
}

fn parse_last_id(text: &str) -> Option<i64> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let line = lines.next()?.trim();
    if lines.next().is_some() {
        return None;
    }
    let value: i64 = line.strip_prefix(LAST_ID_PREFIX)?.trim().parse().ok()?;
    (value >= -1).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fresh_root_starts_at_zero() {
        let temp_dir = TempDir::new().unwrap();
        let registry = GlobalRegistry::new(temp_dir.path());
        assert_eq!(registry.next_id().unwrap(), 0);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(".projects")).unwrap(),
            "last_id=-1\n"
        );
    }

    #[test]
    fn test_next_id_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let registry = GlobalRegistry::new(temp_dir.path());
        let first = registry.next_id().unwrap();
        assert_eq!(registry.next_id().unwrap(), first);
        assert_eq!(registry.next_id().unwrap(), first);
    }

    #[test]
    fn test_advance_then_next_id() {
        let temp_dir = TempDir::new().unwrap();
        let registry = GlobalRegistry::new(temp_dir.path());
        let before = registry.next_id().unwrap();
        assert_eq!(registry.advance().unwrap(), before);
        assert_eq!(registry.next_id().unwrap(), before + 1);
        assert_eq!(registry.last_id().unwrap(), i64::from(before));
    }

    #[test]
    fn test_existing_counter_is_read() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".projects"), "last_id=41").unwrap();
        let registry = GlobalRegistry::new(temp_dir.path());
        assert_eq!(registry.next_id().unwrap(), 42);
    }

    #[test]
    fn test_corrupt_counter() {
        for bad in [
            "",
            "last_id=abc",
            "id=3",
            "last_id=1\nlast_id=2",
            "last_id=-5",
            "last_id=4294967295",
            "last_id=9223372036854775807",
        ] {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join(".projects"), bad).unwrap();
            let registry = GlobalRegistry::new(temp_dir.path());
            assert!(
                matches!(registry.next_id(), Err(Error::CorruptFormat { .. })),
                "expected CorruptFormat for {:?}",
                bad
            );
        }
    }
}
