//! Process-wide cache of open stores, keyed by resolved file path.
//!
//! Opening the same file twice in one process yields the same
//! [`SharedStore`], so there is only ever one in-memory copy per file.
//! The cache is filled only by explicit [`open_shared`] calls.

use super::{KeyValueStore, Schema};
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Handle to a cached store.
pub type SharedStore = Arc<Mutex<KeyValueStore>>;

static STORES: OnceLock<Mutex<HashMap<PathBuf, SharedStore>>> = OnceLock::new();

fn stores() -> Result<MutexGuard<'static, HashMap<PathBuf, SharedStore>>> {
    STORES
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .map_err(|_| Error::Other("store cache lock poisoned".to_string()))
}

/// Lock a shared store for reading or writing.
pub fn lock(store: &SharedStore) -> Result<MutexGuard<'_, KeyValueStore>> {
    store
        .lock()
        .map_err(|_| Error::Other("store lock poisoned".to_string()))
}

/// Resolve a store path to its cache key.
///
/// The file itself may not exist yet, so only the parent directory is
/// canonicalized (it is created if needed).
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        Error::InvalidArgument(format!("{} does not name a file", path.display()))
    })?;
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;
    Ok(parent.canonicalize()?.join(file_name))
}

/// Open (loading on first use) the store at `path` with `schema`.
///
/// Fails with `InvalidArgument` if the file is already open under a
/// different schema.
pub fn open_shared(path: &Path, schema: &'static Schema) -> Result<SharedStore> {
    let resolved = resolve_path(path)?;
    let mut stores = stores()?;

    if let Some(store) = stores.get(&resolved) {
        let open_schema = lock(store)?.schema();
        if !std::ptr::eq(open_schema, schema) {
            return Err(Error::InvalidArgument(format!(
                "{} is already open as a {} store",
                resolved.display(),
                open_schema.name
            )));
        }
        return Ok(Arc::clone(store));
    }

    let store = Arc::new(Mutex::new(KeyValueStore::load(&resolved, schema)?));
    stores.insert(resolved, Arc::clone(&store));
    Ok(store)
}

/// Drop the cached copy of `path` so the next open reloads it from disk.
pub fn evict(path: &Path) -> Result<bool> {
    let resolved = resolve_path(path)?;
    Ok(stores()?.remove(&resolved).is_some())
}
