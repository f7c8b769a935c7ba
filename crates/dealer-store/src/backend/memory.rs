//! In-memory backend: the session/tab-scoped store, and the test double for
//! the persistent one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{EntryMap, StorageBackend, UpdateFn};
use crate::error::StoreResult;

/// Entries held in process memory; dropped with the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<EntryMap>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Unbounded in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory storage that rejects writes past `quota` characters.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStorage {
            entries: Mutex::new(EntryMap::default()),
            quota: Some(quota),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EntryMap> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.lock();
        *entries = entries.with_set(key, value, self.quota)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.lock();
        *entries = entries.with_removed(key);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.lock() = EntryMap::default();
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock().keys())
    }

    fn update(&self, key: &str, f: &mut UpdateFn<'_>) -> StoreResult<()> {
        let mut entries = self.lock();
        *entries = entries.with_update(key, f, self.quota)?;
        Ok(())
    }

    fn entries(&self) -> StoreResult<Vec<(String, String)>> {
        Ok(self.lock().pairs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));

        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
        storage.remove("a").unwrap();
    }

    #[test]
    fn test_quota_leaves_store_unchanged() {
        let storage = MemoryStorage::with_quota(4);
        storage.set("a", "1").unwrap();

        let err = storage.set("b", "too long").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(storage.keys().unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let storage = MemoryStorage::new();
        storage.set("a", "1").unwrap();

        let result = storage.update("a", &mut |_| {
            Err(StoreError::Serialization("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_update_is_atomic_across_threads() {
        use std::sync::Arc;

        let storage = Arc::new(MemoryStorage::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = Arc::clone(&storage);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        storage
                            .update("counter", &mut |current| {
                                let n: u32 = current.and_then(|v| v.parse().ok()).unwrap_or(0);
                                Ok(Some((n + 1).to_string()))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.get("counter").unwrap().as_deref(), Some("800"));
    }
}
