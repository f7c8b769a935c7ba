//! # Storage Backends
//!
//! The synchronous string-keyed primitive the keyed store is built on.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         StorageBackend                                  │
//! │        get / set / remove / clear / keys / update (atomic)             │
//! │                                                                         │
//! │  ┌─────────────────────────────┐   ┌─────────────────────────────────┐ │
//! │  │  FileStorage                │   │  MemoryStorage                  │ │
//! │  │  persistent across restarts │   │  session scoped, gone on drop   │ │
//! │  │  JSON object file, fd-lock  │   │  entries behind a Mutex         │ │
//! │  │  per call, temp file+rename │   │                                 │ │
//! │  └─────────────────────────────┘   └─────────────────────────────────┘ │
//! │                                                                         │
//! │  Both accept an optional quota (characters of keys + values). A write  │
//! │  past the quota fails with StoreError::QuotaExceeded and leaves the    │
//! │  store unchanged.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::{StoreError, StoreResult};

/// Callback for [`StorageBackend::update`].
///
/// Receives the current raw value; returns `Some(new)` to write or `None`
/// to delete the key.
pub type UpdateFn<'a> = dyn FnMut(Option<&str>) -> StoreResult<Option<String>> + 'a;

/// A synchronous string-keyed store with finite capacity.
pub trait StorageBackend: Send + Sync + Debug {
    /// Raw value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Deletes every key.
    fn clear(&self) -> StoreResult<()>;

    /// All keys currently stored.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Atomic read-modify-write of a single key.
    ///
    /// No other operation on this backend interleaves between the read and
    /// the write. If `f` fails nothing is written.
    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> StoreResult<()>;

    /// All key/value pairs.
    fn entries(&self) -> StoreResult<Vec<(String, String)>> {
        let mut entries = Vec::new();
        for key in self.keys()? {
            if let Some(value) = self.get(&key)? {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}

// =============================================================================
// Shared Entry Map
// =============================================================================

/// Entries plus quota accounting, shared by both backends.
#[derive(Debug, Clone, Default)]
pub(crate) struct EntryMap {
    entries: BTreeMap<String, String>,
}

impl EntryMap {
    pub(crate) fn from_map(entries: BTreeMap<String, String>) -> Self {
        EntryMap { entries }
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub(crate) fn pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Characters used by keys and values.
    pub(crate) fn size_chars(&self) -> usize {
        self.entries
            .iter()
            .map(|(k, v)| k.chars().count() + v.chars().count())
            .sum()
    }

    /// Builds the map that results from writing `value` under `key`.
    pub(crate) fn with_set(
        &self,
        key: &str,
        value: &str,
        quota: Option<usize>,
    ) -> StoreResult<Self> {
        let mut next = self.clone();
        next.entries.insert(key.to_string(), value.to_string());
        next.check_growth(self.size_chars(), quota)?;
        Ok(next)
    }

    pub(crate) fn with_removed(&self, key: &str) -> Self {
        let mut next = self.clone();
        next.entries.remove(key);
        next
    }

    pub(crate) fn with_update(
        &self,
        key: &str,
        f: &mut UpdateFn<'_>,
        quota: Option<usize>,
    ) -> StoreResult<Self> {
        match f(self.entries.get(key).map(String::as_str))? {
            Some(value) => self.with_set(key, &value, quota),
            None => Ok(self.with_removed(key)),
        }
    }

    /// Only growth is checked, so a store already over quota can still shrink.
    fn check_growth(&self, previous_size: usize, quota: Option<usize>) -> StoreResult<()> {
        let Some(quota) = quota else {
            return Ok(());
        };

        let size = self.size_chars();
        if size > previous_size && size > quota {
            return Err(StoreError::QuotaExceeded {
                needed: size,
                quota,
            });
        }

        Ok(())
    }
}
