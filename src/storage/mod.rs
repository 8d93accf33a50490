//! Storage layer for sspm key-value files.
//!
//! Both the global configuration and every project's metadata are small INI
//! files with a fixed, pre-declared schema. [`KeyValueStore`] is the shared
//! engine behind both:
//!
//! - `load` reads the file, writing the schema defaults first if it is absent
//! - `get` / `set` only accept keys declared in the schema
//! - every `set` is persisted before returning (atomic replace, no batching)
//! - `reset` backs the file up with a `ddMMyyyy_HHmmss` suffix and rewrites defaults
//!
//! Stores are shared process-wide through [`cache::open_shared`], so two
//! handles to the same file are always the same in-memory copy.

pub mod cache;
pub mod ini;
pub mod schema;

pub use cache::{SharedStore, evict, lock, open_shared};
pub use ini::IniDocument;
pub use schema::{Schema, SchemaEntry, StoreKey, VERSION_KEY, VERSION_SECTION};

use crate::{Error, Result};
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Timestamp format appended to backup file names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%d%m%Y_%H%M%S";

/// A schema-checked key-value file.
#[derive(Debug)]
pub struct KeyValueStore {
    path: PathBuf,
    schema: &'static Schema,
    doc: IniDocument,
}

impl KeyValueStore {
    /// Load the store at `path`, creating a default file first if needed.
    pub fn load(path: &Path, schema: &'static Schema) -> Result<Self> {
        if !path.is_file() {
            debug!(path = %path.display(), store = schema.name, "writing default store");
            write_atomic(path, &default_document(schema).to_string_pretty())?;
        }

        let text = fs::read_to_string(path)?;
        let doc = IniDocument::parse(&text).map_err(|e| Error::CorruptFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), store = schema.name, "loaded store");

        Ok(Self {
            path: path.to_path_buf(),
            schema,
            doc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Declared keys in dotted form.
    pub fn keys(&self) -> Vec<String> {
        self.schema.keys()
    }

    /// Value for a validated key.
    ///
    /// Declared keys missing from an older file read as their schema default.
    pub fn get(&self, key: &StoreKey) -> String {
        self.doc
            .get(key.section(), key.key())
            .unwrap_or(key.entry().default)
            .to_string()
    }

    /// Value for a dotted key (`section.key`).
    pub fn get_str(&self, dotted: &str) -> Result<String> {
        let key = StoreKey::parse(dotted, self.schema)?;
        Ok(self.get(&key))
    }

    /// Set a value and persist the whole store.
    ///
    /// The value is stored in the form a reload would return (lines
    /// trimmed). If the write fails the in-memory copy is rolled back.
    pub fn set(&mut self, key: &StoreKey, value: &str) -> Result<()> {
        let value = IniDocument::normalize_value(value);
        let previous = self.doc.set(key.section(), key.key(), &value);
        if let Err(e) = self.persist() {
            match previous {
                Some(old) => {
                    self.doc.set(key.section(), key.key(), &old);
                }
                None => self.doc.remove(key.section(), key.key()),
            }
            return Err(e);
        }
        Ok(())
    }

    /// Set a value by dotted key.
    pub fn set_str(&mut self, dotted: &str, value: &str) -> Result<()> {
        let key = StoreKey::parse(dotted, self.schema)?;
        self.set(&key, value)
    }

    /// All `(dotted key, value)` pairs in schema order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.schema
            .entries
            .iter()
            .map(|e| {
                let value = self.doc.get(e.section, e.key).unwrap_or(e.default);
                (e.dotted(), value.to_string())
            })
            .collect()
    }

    /// The stored schema revision.
    pub fn version(&self) -> String {
        self.doc
            .get(VERSION_SECTION, VERSION_KEY)
            .unwrap_or_default()
            .to_string()
    }

    /// True iff the version matches, mandatory keys are non-empty, and every
    /// directory-valued mandatory key names a directory (created if missing).
    pub fn is_valid(&self) -> bool {
        if self.version() != self.schema.version {
            return false;
        }

        for entry in self.schema.entries.iter().filter(|e| e.mandatory) {
            let value = self.doc.get(entry.section, entry.key).unwrap_or_default();
            if value.is_empty() {
                return false;
            }
            if entry.directory {
                let dir = Path::new(value);
                if fs::create_dir_all(dir).is_err() || !dir.is_dir() {
                    return false;
                }
            }
        }

        true
    }

    /// Back up the current file (if any) and rewrite the schema defaults.
    ///
    /// Returns the backup path when a backup was made.
    pub fn reset(&mut self) -> Result<Option<PathBuf>> {
        let backup = if self.path.is_file() {
            let backup = backup_path(&self.path);
            fs::copy(&self.path, &backup)?;
            info!(from = %self.path.display(), to = %backup.display(), "backed up store");
            Some(backup)
        } else {
            None
        };

        self.doc = default_document(self.schema);
        self.persist()?;
        Ok(backup)
    }

    fn persist(&self) -> Result<()> {
        write_atomic(&self.path, &self.doc.to_string_pretty())?;
        debug!(path = %self.path.display(), "persisted store");
        Ok(())
    }
}

/// The document a schema writes when no file exists yet.
pub fn default_document(schema: &Schema) -> IniDocument {
    let mut doc = IniDocument::new();
    for entry in schema.entries {
        let value = if entry.section == VERSION_SECTION && entry.key == VERSION_KEY {
            schema.version
        } else {
            entry.default
        };
        doc.set(entry.section, entry.key, value);
    }
    doc
}

/// `<stem>_<ddMMyyyy_HHmmss>.<ext>` next to the original file.
///
/// A `_<n>` suffix is added to the stamp when that name is already taken.
pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().to_string());

    let mut tag = stamp.clone();
    let mut n = 1;
    loop {
        let name = match &ext {
            Some(ext) => format!("{}_{}.{}", stem, tag, ext),
            None => format!("{}_{}", stem, tag),
        };
        let candidate = path.with_file_name(name);
        if !candidate.exists() {
            return candidate;
        }
        tag = format!("{}_{}", stamp, n);
        n += 1;
    }
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// Readers see either the old or the new file, never a partial one.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    match_permissions(tmp.as_file(), path)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Temporary files are created `0600`; keep the mode of the file being
/// replaced, or `0644` for a new one.
#[cfg(unix)]
fn match_permissions(tmp: &fs::File, path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let permissions = fs::metadata(path)
        .map(|m| m.permissions())
        .unwrap_or_else(|_| fs::Permissions::from_mode(0o644));
    tmp.set_permissions(permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn match_permissions(_tmp: &fs::File, _path: &Path) -> Result<()> {
    Ok(())
}
