//! Per-table display settings and per-page filters.
//!
//! Both replace the stored object wholesale; nothing is merged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreResult;
use crate::store::{read_or_none, report, update_json, write_json, KeyedStore};

pub const TABLE_SETTINGS_KEY: &str = "tableSettings";
pub const FILTERS_KEY_PREFIX: &str = "filters_";

// =============================================================================
// Table Settings
// =============================================================================

/// Column visibility, sort order, page size and the like, keyed by table id.
#[derive(Debug, Clone, Copy)]
pub struct TableSettings<'a> {
    store: &'a KeyedStore,
}

impl<'a> TableSettings<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        TableSettings { store }
    }

    pub fn save<T: Serialize + ?Sized>(&self, table_id: &str, settings: &T) -> bool {
        report("save_table_settings", table_id, self.try_save(table_id, settings))
    }

    fn try_save<T: Serialize + ?Sized>(&self, table_id: &str, settings: &T) -> StoreResult<()> {
        let settings = serde_json::to_value(settings)?;
        update_json::<Map<String, Value>, _>(self.store.local(), TABLE_SETTINGS_KEY, |current| {
            let mut tables = current.unwrap_or_default();
            tables.insert(table_id.to_string(), settings);
            Some(tables)
        })
    }

    pub fn get<T: DeserializeOwned>(&self, table_id: &str) -> Option<T> {
        read_or_none::<Map<String, Value>>(self.store.local(), TABLE_SETTINGS_KEY)?
            .remove(table_id)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn remove(&self, table_id: &str) -> bool {
        let result =
            update_json::<Map<String, Value>, _>(self.store.local(), TABLE_SETTINGS_KEY, |current| {
                let mut tables = current.unwrap_or_default();
                tables.remove(table_id);
                Some(tables)
            });
        report("remove_table_settings", table_id, result)
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Saved list filters, one key per page (`filters_<pageId>`).
#[derive(Debug, Clone, Copy)]
pub struct Filters<'a> {
    store: &'a KeyedStore,
}

fn filters_key(page_id: &str) -> String {
    format!("{}{}", FILTERS_KEY_PREFIX, page_id)
}

impl<'a> Filters<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        Filters { store }
    }

    pub fn save<T: Serialize + ?Sized>(&self, page_id: &str, filters: &T) -> bool {
        let key = filters_key(page_id);
        report("save_filters", &key, write_json(self.store.local(), &key, filters))
    }

    pub fn get<T: DeserializeOwned>(&self, page_id: &str) -> Option<T> {
        read_or_none(self.store.local(), &filters_key(page_id))
    }

    pub fn clear(&self, page_id: &str) -> bool {
        let key = filters_key(page_id);
        report("clear_filters", &key, self.store.local().remove(&key))
    }
}
