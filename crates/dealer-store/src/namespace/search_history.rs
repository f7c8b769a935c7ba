//! Recent search queries (`searchHistory`), most recent first.

use crate::store::{read_or_none, report, update_json, KeyedStore};

pub const SEARCH_HISTORY_KEY: &str = "searchHistory";

#[derive(Debug, Clone, Copy)]
pub struct SearchHistory<'a> {
    store: &'a KeyedStore,
}

impl<'a> SearchHistory<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        SearchHistory { store }
    }

    /// Records `query` (trimmed) at the front of the history.
    ///
    /// Blank queries are ignored and return false. A repeated query is
    /// moved to the front.
    pub fn add(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        let max = self.store.limits().search_history_max;
        let result =
            update_json::<Vec<String>, _>(self.store.local(), SEARCH_HISTORY_KEY, |current| {
                let mut history = current.unwrap_or_default();
                history.retain(|existing| existing != query);
                history.insert(0, query.to_string());
                history.truncate(max);
                Some(history)
            });
        report("add_search", SEARCH_HISTORY_KEY, result)
    }

    pub fn list(&self) -> Vec<String> {
        read_or_none(self.store.local(), SEARCH_HISTORY_KEY).unwrap_or_default()
    }

    pub fn clear(&self) -> bool {
        report(
            "clear_search_history",
            SEARCH_HISTORY_KEY,
            self.store.local().remove(SEARCH_HISTORY_KEY),
        )
    }
}
