//! Recently viewed items per category (`recent_<category>`), most recent
//! first, de-duplicated by `id`.

use serde::Serialize;
use serde_json::Value;

use crate::error::StoreResult;
use crate::store::{read_or_none, report, update_json, KeyedStore};

pub const RECENT_KEY_PREFIX: &str = "recent_";

fn recent_key(category: &str) -> String {
    format!("{}{}", RECENT_KEY_PREFIX, category)
}

#[derive(Debug, Clone, Copy)]
pub struct RecentItems<'a> {
    store: &'a KeyedStore,
}

impl<'a> RecentItems<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        RecentItems { store }
    }

    /// Puts `item` at the front of `category`, capped at the configured
    /// `recent_items_max`.
    pub fn add<T: Serialize + ?Sized>(&self, category: &str, item: &T) -> bool {
        self.add_with_limit(category, item, self.store.limits().recent_items_max)
    }

    /// Puts `item` at the front of `category`, keeping at most `max_items`.
    ///
    /// An existing item with the same `id` is moved rather than duplicated.
    pub fn add_with_limit<T: Serialize + ?Sized>(
        &self,
        category: &str,
        item: &T,
        max_items: usize,
    ) -> bool {
        let key = recent_key(category);
        report("add_recent", &key, self.try_add(&key, item, max_items))
    }

    fn try_add<T: Serialize + ?Sized>(
        &self,
        key: &str,
        item: &T,
        max_items: usize,
    ) -> StoreResult<()> {
        let item = serde_json::to_value(item)?;

        update_json::<Vec<Value>, _>(self.store.local(), key, |current| {
            let mut items = current.unwrap_or_default();
            if let Some(id) = item.get("id") {
                items.retain(|existing| existing.get("id") != Some(id));
            }
            items.insert(0, item);
            items.truncate(max_items);
            Some(items)
        })
    }

    /// Items in `category`, most recent first.
    pub fn list(&self, category: &str) -> Vec<Value> {
        read_or_none(self.store.local(), &recent_key(category)).unwrap_or_default()
    }

    pub fn clear(&self, category: &str) -> bool {
        let key = recent_key(category);
        report("clear_recent", &key, self.store.local().remove(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreLimits;
    use serde_json::json;

    #[test]
    fn test_cap_keeps_most_recent() {
        let store = KeyedStore::in_memory();
        let recent = store.recent();

        for n in 0..11 {
            recent.add_with_limit("motorbikes", &json!({"id": n}), 10);
        }

        let items = recent.list("motorbikes");
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["id"], 10);
        assert_eq!(items[9]["id"], 1);
    }

    #[test]
    fn test_re_adding_moves_to_front() {
        let store = KeyedStore::in_memory();
        let recent = store.recent();

        recent.add("customers", &json!({"id": "C-1", "name": "An"}));
        recent.add("customers", &json!({"id": "C-2", "name": "Bình"}));
        recent.add("customers", &json!({"id": "C-1", "name": "An (updated)"}));

        let items = recent.list("customers");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], json!({"id": "C-1", "name": "An (updated)"}));
        assert_eq!(items[1]["id"], "C-2");
    }

    #[test]
    fn test_default_cap_comes_from_limits() {
        let limits = StoreLimits {
            recent_items_max: 3,
            ..StoreLimits::default()
        };
        let store = KeyedStore::in_memory().with_limits(limits);

        for n in 0..5 {
            store.recent().add("orders", &json!({"id": n}));
        }
        assert_eq!(store.recent().list("orders").len(), 3);
    }

    #[test]
    fn test_categories_are_separate_keys() {
        let store = KeyedStore::in_memory();
        store.recent().add("a", &json!({"id": 1}));
        store.recent().add("b", &json!({"id": 2}));

        assert!(store.exists("recent_a"));
        assert!(store.recent().clear("a"));
        assert!(store.recent().list("a").is_empty());
        assert_eq!(store.recent().list("b").len(), 1);
    }
}
