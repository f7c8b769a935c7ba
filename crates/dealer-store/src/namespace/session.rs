//! Session-scoped values. Same JSON semantics as the persistent store, but
//! kept in the session backend and gone when the session ends.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::store::{read_or_none, report, write_json, KeyedStore};

#[derive(Debug, Clone, Copy)]
pub struct SessionScope<'a> {
    store: &'a KeyedStore,
}

impl<'a> SessionScope<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        SessionScope { store }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        report(
            "set_session",
            key,
            write_json(self.store.session_backend(), key, value),
        )
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        read_or_none(self.store.session_backend(), key).unwrap_or(default)
    }

    pub fn remove(&self, key: &str) -> bool {
        report("remove_session", key, self.store.session_backend().remove(key))
    }

    pub fn clear(&self) -> bool {
        info!("Clearing session store");
        report("clear_session", "*", self.store.session_backend().clear())
    }

    pub fn exists(&self, key: &str) -> bool {
        matches!(self.store.session_backend().get(key), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_session_is_separate_from_local() {
        let store = KeyedStore::in_memory();

        assert!(store.session().set("activeTab", "invoices"));
        assert_eq!(store.session().get("activeTab", String::new()), "invoices");
        assert!(!store.exists("activeTab"));

        store.set("activeTab", "orders");
        assert_eq!(store.session().get("activeTab", String::new()), "invoices");
    }

    #[test]
    fn test_remove_and_clear() {
        let store = KeyedStore::in_memory();
        let session = store.session();

        session.set("wizard", &json!({"step": 2}));
        session.set("token", "abc");
        assert!(session.remove("token"));
        assert!(!session.exists("token"));

        assert!(session.clear());
        assert_eq!(session.get("wizard", Value::Null), Value::Null);
    }
}
