//! User preferences: one `userPreferences` object, sub-keyed by name.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreResult;
use crate::store::{read_or_none, report, update_json, KeyedStore};

pub const PREFERENCES_KEY: &str = "userPreferences";

/// Preferences such as theme, language, or page size.
#[derive(Debug, Clone, Copy)]
pub struct Preferences<'a> {
    store: &'a KeyedStore,
}

impl<'a> Preferences<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        Preferences { store }
    }

    /// The preference `name`, or `default` if unset or of another type.
    pub fn get<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        self.all()
            .remove(name)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(default)
    }

    pub fn set<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> bool {
        report("set_preference", name, self.try_set(name, value))
    }

    pub fn try_set<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> StoreResult<()> {
        let value = serde_json::to_value(value)?;
        update_json::<Map<String, Value>, _>(self.store.local(), PREFERENCES_KEY, |current| {
            let mut prefs = current.unwrap_or_default();
            prefs.insert(name.to_string(), value);
            Some(prefs)
        })
    }

    pub fn remove(&self, name: &str) -> bool {
        let result =
            update_json::<Map<String, Value>, _>(self.store.local(), PREFERENCES_KEY, |current| {
                let mut prefs = current.unwrap_or_default();
                prefs.remove(name);
                Some(prefs)
            });
        report("remove_preference", name, result)
    }

    /// Every stored preference.
    pub fn all(&self) -> Map<String, Value> {
        read_or_none(self.store.local(), PREFERENCES_KEY).unwrap_or_default()
    }
}
