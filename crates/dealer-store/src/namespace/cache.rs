//! # Response Cache
//!
//! API responses kept as TTL entries under `cache_<key>`. Expiry is checked
//! on read only; stale entries are removed when someone asks for them.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::store::{report, KeyedStore};

pub const CACHE_KEY_PREFIX: &str = "cache_";

fn cache_key(key: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, key)
}

#[derive(Debug, Clone, Copy)]
pub struct Cache<'a> {
    store: &'a KeyedStore,
}

impl<'a> Cache<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        Cache { store }
    }

    /// Caches `value` for the configured lifetime (one hour by default).
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        self.set_with_ttl(key, value, self.store.limits().cache_ttl())
    }

    pub fn set_with_ttl<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        self.store.set_with_expiry(&cache_key(key), value, ttl)
    }

    /// The cached value, or `None` if missing or stale.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get_with_expiry_opt(&cache_key(key));
        debug!(key, hit = value.is_some(), "Cache lookup");
        value
    }

    pub fn remove(&self, key: &str) -> bool {
        self.store.remove(&cache_key(key))
    }

    /// Removes every `cache_` entry, fresh or not.
    pub fn clear_all(&self) -> bool {
        let keys = match self.store.local().keys() {
            Ok(keys) => keys,
            Err(e) => return report("clear_cache", CACHE_KEY_PREFIX, Err(e)),
        };

        let mut cleared = true;
        for key in keys.iter().filter(|k| k.starts_with(CACHE_KEY_PREFIX)) {
            cleared &= report("clear_cache", key, self.store.local().remove(key));
        }
        cleared
    }
}
