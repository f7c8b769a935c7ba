//! # Keyed Store
//!
//! JSON values over a string-keyed [`StorageBackend`], plus TTL entries and
//! the repository-style namespaces the admin pages use.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           KeyedStore                                    │
//! │                                                                         │
//! │  set / get / remove / exists          set_with_expiry / get_with_expiry │
//! │        │                                        │                       │
//! │        ▼                                        ▼                       │
//! │  serde_json::to_string              {"value": ..., "expiry": <ms>}      │
//! │        │                                        │                       │
//! │        └──────────────┬─────────────────────────┘                       │
//! │                       ▼                                                 │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │ local: Arc<dyn Storage...>   │   │ session: Arc<dyn Storage...> │   │
//! │  │ persistent (FileStorage)     │   │ tab scoped (MemoryStorage)   │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  Namespaces: preferences() drafts() recent() search_history()          │
//! │              table_settings() filters() cache() session()              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Contract
//! Persistence is best-effort. The plain methods return `bool` or the
//! caller's default and log the cause with `tracing::warn!`; the `try_*`
//! methods return [`StoreResult`] for callers that need the reason.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{FileStorage, MemoryStorage, StorageBackend};
use crate::clock::{Clock, SystemClock};
use crate::config::{StoreConfig, StoreLimits};
use crate::error::{StoreError, StoreResult};
use crate::namespace::{
    Cache, Drafts, Filters, Preferences, RecentItems, SearchHistory, SessionScope, TableSettings,
};

const SENTINEL_KEY_PREFIX: &str = "__storage_sentinel_";

// =============================================================================
// Expiring Entry
// =============================================================================

/// Wire shape of a TTL entry.
#[derive(Debug, Serialize, Deserialize)]
struct ExpiringEntry<T> {
    value: T,
    /// Unix epoch milliseconds after which the entry is stale.
    expiry: i64,
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

// =============================================================================
// Backend Helpers (shared with the namespaces)
// =============================================================================

pub(crate) fn read_json<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> StoreResult<Option<T>> {
    match backend.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_string(value)?;
    backend.set(key, &raw)
}

/// Atomic read-modify-write of the JSON value under `key`.
///
/// A stored value that does not parse as `T` is handed to `f` as `None`.
/// Returning `None` from `f` deletes the key.
pub(crate) fn update_json<T, F>(backend: &dyn StorageBackend, key: &str, f: F) -> StoreResult<()>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(Option<T>) -> Option<T>,
{
    let mut f = Some(f);
    backend.update(key, &mut |current| {
        let current = current.and_then(|raw| match serde_json::from_str::<T>(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "Replacing unreadable stored value");
                None
            }
        });

        let f = f
            .take()
            .ok_or_else(|| StoreError::Unavailable("update callback invoked twice".into()))?;

        match f(current) {
            Some(next) => Ok(Some(serde_json::to_string(&next)?)),
            None => Ok(None),
        }
    })
}

/// Turns a `try_*` outcome into the best-effort `bool`.
pub(crate) fn report(operation: &str, key: &str, result: StoreResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(operation, key, error = %e, "Storage operation failed");
            false
        }
    }
}

/// Reads `key`, logging and discarding failures.
pub(crate) fn read_or_none<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> Option<T> {
    match read_json(backend, key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value");
            None
        }
    }
}

// =============================================================================
// KeyedStore
// =============================================================================

/// Namespaced JSON storage over a persistent and a session backend.
///
/// Construct one per application (or per test) and pass it by reference.
///
/// ## Example
/// ```rust
/// use dealer_store::KeyedStore;
/// use serde_json::json;
///
/// let store = KeyedStore::in_memory();
/// assert!(store.set("lastInvoice", &json!({"id": "INV-001", "total": 45500000})));
///
/// let value: serde_json::Value = store.get("lastInvoice", serde_json::Value::Null);
/// assert_eq!(value["id"], "INV-001");
/// ```
#[derive(Debug, Clone)]
pub struct KeyedStore {
    local: Arc<dyn StorageBackend>,
    session: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    limits: StoreLimits,
}

impl KeyedStore {
    /// Creates a store over the given persistent and session backends.
    pub fn new(local: Arc<dyn StorageBackend>, session: Arc<dyn StorageBackend>) -> Self {
        KeyedStore {
            local,
            session,
            clock: Arc::new(SystemClock),
            limits: StoreLimits::default(),
        }
    }

    /// Both backends in memory. Nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    /// Opens the persistent file named by `config`, with an in-memory
    /// session backend.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let path = config
            .resolved_storage_path()
            .ok_or_else(|| StoreError::Unavailable("no storage path available".into()))?;

        let local = FileStorage::open(path, Some(config.storage.quota_chars))?;
        let session = MemoryStorage::with_quota(config.storage.session_quota_chars);

        info!(path = ?local.path(), "Keyed store opened");
        Ok(Self::new(Arc::new(local), Arc::new(session)).with_limits(config.limits))
    }

    /// Like [`KeyedStore::open`], but falls back to memory if the file
    /// cannot be opened.
    pub fn open_or_in_memory(config: &StoreConfig) -> Self {
        Self::open(config).unwrap_or_else(|e| {
            warn!("Persistent storage unavailable: {}. Using memory only.", e);
            let session = MemoryStorage::with_quota(config.storage.session_quota_chars);
            Self::new(
                Arc::new(MemoryStorage::with_quota(config.storage.quota_chars)),
                Arc::new(session),
            )
            .with_limits(config.limits)
        })
    }

    /// Replaces the clock used for TTL expiry and draft timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the namespace caps and cache lifetime.
    pub fn with_limits(mut self, limits: StoreLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    pub(crate) fn local(&self) -> &dyn StorageBackend {
        self.local.as_ref()
    }

    pub(crate) fn session_backend(&self) -> &dyn StorageBackend {
        self.session.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // =========================================================================
    // Core Primitives
    // =========================================================================

    /// Stores `value` as JSON under `key`. Returns false if it was not stored.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        report("set", key, self.try_set(key, value))
    }

    pub fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        write_json(self.local(), key, value)
    }

    /// Reads `key`, or `default` if it is absent or does not parse as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_opt(key).unwrap_or(default)
    }

    /// Reads `key`, or `None` if it is absent or does not parse as `T`.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        read_or_none(self.local(), key)
    }

    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        read_json(self.local(), key)
    }

    pub fn remove(&self, key: &str) -> bool {
        report("remove", key, self.local.remove(key))
    }

    /// Wipes the entire persistent store.
    pub fn clear(&self) -> bool {
        info!("Clearing persistent store");
        report("clear", "*", self.local.clear())
    }

    pub fn exists(&self, key: &str) -> bool {
        matches!(self.local.get(key), Ok(Some(_)))
    }

    /// All keys in the persistent store.
    pub fn keys(&self) -> Vec<String> {
        self.local.keys().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list keys");
            Vec::new()
        })
    }

    // =========================================================================
    // TTL Entries
    // =========================================================================

    /// Stores `value` wrapped with an expiry of now + `ttl`.
    pub fn set_with_expiry<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> bool {
        report("set_with_expiry", key, self.try_set_with_expiry(key, value, ttl))
    }

    pub fn try_set_with_expiry<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> StoreResult<()> {
        let entry = ExpiringEntry {
            value,
            expiry: self.clock.now_millis().saturating_add(ttl_millis(ttl)),
        };
        write_json(self.local(), key, &entry)
    }

    /// Reads a TTL entry, or `default` if it is absent, unreadable, or stale.
    ///
    /// A stale entry is deleted on the way out. There is no background sweep.
    pub fn get_with_expiry<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_with_expiry_opt(key).unwrap_or(default)
    }

    pub fn get_with_expiry_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry: ExpiringEntry<Value> = read_or_none(self.local(), key)?;

        let now = self.clock.now_millis();
        if now > entry.expiry {
            debug!(key, expiry = entry.expiry, now, "Evicting expired entry");
            self.evict_if_expired(key, now);
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "Stored value has a different shape");
                None
            }
        }
    }

    /// Removes `key` only if it is still expired, so a value written since
    /// the read survives.
    fn evict_if_expired(&self, key: &str, now: i64) {
        let result = self.local.update(key, &mut |current| {
            let still_expired = current
                .and_then(|raw| serde_json::from_str::<ExpiringEntry<Value>>(raw).ok())
                .map_or(true, |entry| now > entry.expiry);

            Ok(if still_expired {
                None
            } else {
                current.map(str::to_string)
            })
        });
        report("evict", key, result);
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    pub fn preferences(&self) -> Preferences<'_> {
        Preferences::new(self)
    }

    pub fn drafts(&self) -> Drafts<'_> {
        Drafts::new(self)
    }

    pub fn recent(&self) -> RecentItems<'_> {
        RecentItems::new(self)
    }

    pub fn search_history(&self) -> SearchHistory<'_> {
        SearchHistory::new(self)
    }

    pub fn table_settings(&self) -> TableSettings<'_> {
        TableSettings::new(self)
    }

    pub fn filters(&self) -> Filters<'_> {
        Filters::new(self)
    }

    pub fn cache(&self) -> Cache<'_> {
        Cache::new(self)
    }

    pub fn session(&self) -> SessionScope<'_> {
        SessionScope::new(self)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Characters used by all persistent keys and values.
    ///
    /// A proxy for bytes, not an exact measure.
    pub fn storage_size(&self) -> usize {
        match self.local.entries() {
            Ok(entries) => entries
                .iter()
                .map(|(k, v)| k.chars().count() + v.chars().count())
                .sum(),
            Err(e) => {
                warn!(error = %e, "Failed to measure storage");
                0
            }
        }
    }

    /// True if a small sentinel write is rejected.
    pub fn is_storage_full(&self) -> bool {
        let sentinel = format!("{}{}", SENTINEL_KEY_PREFIX, Uuid::new_v4());

        match self.local.set(&sentinel, "x") {
            Ok(()) => {
                report("remove", &sentinel, self.local.remove(&sentinel));
                false
            }
            Err(e) => {
                debug!(error = %e, "Sentinel write rejected");
                true
            }
        }
    }

    /// Snapshot of every persistent entry as one JSON object of raw strings.
    pub fn export_storage(&self) -> Option<String> {
        self.try_export_storage()
            .map_err(|e| warn!(error = %e, "Failed to export storage"))
            .ok()
    }

    pub fn try_export_storage(&self) -> StoreResult<String> {
        let snapshot: Map<String, Value> = self
            .local
            .entries()?
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Restores a snapshot made by [`KeyedStore::export_storage`].
    ///
    /// String values are written as-is; anything else is written as its JSON
    /// text. Existing keys not in the snapshot are kept.
    pub fn import_storage(&self, snapshot: &str) -> bool {
        match self.try_import_storage(snapshot) {
            Ok(count) => {
                info!(entries = count, "Storage snapshot imported");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to import storage");
                false
            }
        }
    }

    /// Returns the number of entries written.
    pub fn try_import_storage(&self, snapshot: &str) -> StoreResult<usize> {
        let parsed: Value = serde_json::from_str(snapshot)
            .map_err(|e| StoreError::InvalidImport(e.to_string()))?;

        let Value::Object(entries) = parsed else {
            return Err(StoreError::InvalidImport("expected a JSON object".into()));
        };

        for (key, value) in &entries {
            match value {
                Value::String(raw) => self.local.set(key, raw)?,
                other => self.local.set(key, &other.to_string())?,
            }
        }

        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;

    fn store_with_clock(start: i64) -> (KeyedStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let store = KeyedStore::in_memory().with_clock(clock.clone());
        (store, clock)
    }

    #[test]
    fn test_round_trip_nested_json() {
        let store = KeyedStore::in_memory();
        let order = json!({
            "id": "ORD-7",
            "items": [{"model": "Vision", "qty": 2}, {"model": "SH 160i", "qty": 1}],
            "customer": {"name": "Trần Văn B", "vip": true}
        });

        assert!(store.set("order", &order));
        assert_eq!(store.get("order", Value::Null), order);
    }

    #[test]
    fn test_get_falls_back_to_default() {
        let store = KeyedStore::in_memory();
        assert_eq!(store.get("missing", 42_i32), 42);

        store.set("name", "Wave Alpha");
        // Stored a string, asked for a number
        assert_eq!(store.get("name", 7_i32), 7);
    }

    #[test]
    fn test_corrupt_raw_value_reads_as_default() {
        let store = KeyedStore::in_memory();
        store.local().set("broken", "{not json").unwrap();
        assert_eq!(store.get("broken", json!("fallback")), json!("fallback"));
    }

    #[test]
    fn test_remove_and_exists() {
        let store = KeyedStore::in_memory();
        store.set("k", &1);
        assert!(store.exists("k"));
        assert!(store.remove("k"));
        assert!(!store.exists("k"));
        assert!(store.remove("k"));
    }

    #[test]
    fn test_expiry_is_lazy() {
        let (store, clock) = store_with_clock(1_000);
        store.set_with_expiry("quote", &json!({"price": 32_000_000}), Duration::from_millis(10));

        clock.advance(10);
        // now == expiry is still fresh
        assert_eq!(store.get_with_expiry("quote", Value::Null)["price"], 32_000_000);
        assert!(store.exists("quote"));

        clock.advance(1);
        assert_eq!(store.get_with_expiry("quote", json!("default")), json!("default"));
        assert!(!store.exists("quote"));
    }

    #[test]
    fn test_expiring_entry_wire_shape() {
        let (store, _) = store_with_clock(5_000);
        store.set_with_expiry("k", "v", Duration::from_millis(250));

        let raw: Value = store.get("k", Value::Null);
        assert_eq!(raw, json!({"value": "v", "expiry": 5_250}));
    }

    #[test]
    fn test_evict_keeps_fresh_rewrite() {
        let (store, _) = store_with_clock(1_000);
        store.set_with_expiry("k", "fresh", Duration::from_secs(60));

        store.evict_if_expired("k", 1_500);
        assert!(store.exists("k"));
    }

    #[test]
    fn test_export_then_import_restores_entries() {
        let source = KeyedStore::in_memory();
        source.set("userPreferences", &json!({"theme": "dark"}));
        source.set("searchHistory", &json!(["honda"]));

        let snapshot = source.export_storage().unwrap();

        let target = KeyedStore::in_memory();
        assert!(target.import_storage(&snapshot));
        assert_eq!(
            target.get("userPreferences", Value::Null),
            json!({"theme": "dark"})
        );
        assert_eq!(target.get("searchHistory", Value::Null), json!(["honda"]));
    }

    #[test]
    fn test_import_encodes_non_string_values() {
        let store = KeyedStore::in_memory();
        assert!(store.import_storage(r#"{"count": 3, "flags": {"a": true}}"#));
        assert_eq!(store.local().get("count").unwrap().as_deref(), Some("3"));
        assert_eq!(store.get("flags", Value::Null), json!({"a": true}));
    }

    #[test]
    fn test_import_rejects_non_objects() {
        let store = KeyedStore::in_memory();
        assert!(!store.import_storage("[1, 2, 3]"));
        assert!(!store.import_storage("not json"));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_storage_size_and_full_check() {
        let local = Arc::new(MemoryStorage::with_quota(20));
        let store = KeyedStore::new(local, Arc::new(MemoryStorage::new()));

        store.local().set("ab", "cdef").unwrap();
        assert_eq!(store.storage_size(), 6);
        assert!(store.is_storage_full());
        assert_eq!(store.keys(), vec!["ab".to_string()]);

        let roomy = KeyedStore::in_memory();
        assert!(!roomy.is_storage_full());
        assert!(roomy.keys().is_empty());
    }

    #[test]
    fn test_quota_failure_returns_false() {
        let local = Arc::new(MemoryStorage::with_quota(16));
        let store = KeyedStore::new(local, Arc::new(MemoryStorage::new()));

        assert!(!store.set("draft", &"x".repeat(64)));
        assert!(matches!(
            store.try_set("draft", &"x".repeat(64)),
            Err(StoreError::QuotaExceeded { .. })
        ));
        assert!(!store.exists("draft"));
    }

    #[test]
    fn test_update_json_treats_garbage_as_absent() {
        let store = KeyedStore::in_memory();
        store.local().set("list", "garbage").unwrap();

        update_json::<Vec<i32>, _>(store.local(), "list", |current| {
            assert!(current.is_none());
            Some(vec![1])
        })
        .unwrap();

        assert_eq!(store.get("list", Vec::<i32>::new()), vec![1]);
    }
}
