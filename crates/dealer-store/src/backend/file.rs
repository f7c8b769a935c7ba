//! # File Backend
//!
//! Persistent storage that survives restarts: every entry lives in one JSON
//! object file.
//!
//! ## Write Path
//! ```text
//! set("formDrafts", "{...}")
//!      │
//!      ▼
//! exclusive lock on store.json.lock   (fd-lock, held until the rename)
//!      │
//!      ▼
//! re-read store.json ──► build next map ──► quota check
//!      │
//!      ▼
//! write unique temp file ──► rename over store.json
//! ```
//! Several handles (or processes) on the same path see each other's writes:
//! nothing is cached between calls, and every read-modify-write runs under
//! the lock. A failed write leaves the file untouched.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{EntryMap, StorageBackend, UpdateFn};
use crate::error::StoreResult;

/// JSON-file-backed storage.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock_path: PathBuf,
    quota: Option<usize>,
}

impl FileStorage {
    /// Opens (or creates) the storage file at `path`.
    ///
    /// A file that is not a JSON object of strings reads as empty and is
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");

        let storage = FileStorage {
            path,
            lock_path: PathBuf::from(lock_name),
            quota,
        };

        match storage.read_raw()?.map(|contents| parse(&contents)) {
            Some(Some(map)) => {
                info!(path = ?storage.path, entries = map.len(), "Opened storage file");
            }
            Some(None) => {
                warn!(path = ?storage.path, "Storage file is corrupt, starting empty");
            }
            None => {
                debug!(path = ?storage.path, "Storage file not found, starting empty");
            }
        }

        Ok(storage)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> StoreResult<RwLock<File>> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&self.lock_path)?;
        Ok(RwLock::new(file))
    }

    fn read_raw(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Current file contents. Caller holds the lock.
    fn load(&self) -> StoreResult<EntryMap> {
        let map = self
            .read_raw()?
            .and_then(|contents| parse(&contents))
            .unwrap_or_default();
        Ok(EntryMap::from_map(map))
    }

    fn persist(&self, entries: &EntryMap) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, entries.as_map())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Runs `f` on a fresh copy of the entries under a shared lock.
    fn read<T>(&self, f: impl FnOnce(&EntryMap) -> T) -> StoreResult<T> {
        let lock = self.lock_file()?;
        let _guard = lock.read()?;
        Ok(f(&self.load()?))
    }

    /// Read-modify-write under an exclusive lock. Nothing is written if `f`
    /// fails.
    fn mutate(&self, f: impl FnOnce(&EntryMap) -> StoreResult<EntryMap>) -> StoreResult<()> {
        let mut lock = self.lock_file()?;
        let _guard = lock.write()?;
        let next = f(&self.load()?)?;
        self.persist(&next)
    }
}

fn parse(contents: &str) -> Option<BTreeMap<String, String>> {
    serde_json::from_str(contents).ok()
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.read(|entries| entries.get(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.mutate(|entries| entries.with_set(key, value, self.quota))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.mutate(|entries| Ok(entries.with_removed(key)))
    }

    fn clear(&self) -> StoreResult<()> {
        self.mutate(|_| Ok(EntryMap::default()))
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.read(EntryMap::keys)
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> StoreResult<()> {
        self.mutate(|entries| entries.with_update(key, f, self.quota))
    }

    fn entries(&self) -> StoreResult<Vec<(String, String)>> {
        self.read(EntryMap::pairs)
    }
}
