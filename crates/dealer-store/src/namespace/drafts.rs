//! # Form Drafts
//!
//! Unsaved form input, kept under one `formDrafts` object sub-keyed by form
//! name. Saving overwrites the previous draft; nothing is merged.
//!
//! ```text
//! formDrafts = {
//!   "customer-form": { "data": {...}, "savedAt": "2026-03-05T08:30:00Z" },
//!   "order-form":    { "data": {...}, "savedAt": "2026-03-05T09:12:44Z" }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreResult;
use crate::store::{read_or_none, report, update_json, KeyedStore};

pub const DRAFTS_KEY: &str = "formDrafts";

/// A saved draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub data: Value,
    pub saved_at: DateTime<Utc>,
}

/// Stored drafts, sub-keyed by form name.
///
/// Entries that do not parse as [`Draft`] are kept as raw JSON so one bad
/// entry does not hide the rest.
type DraftMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy)]
pub struct Drafts<'a> {
    store: &'a KeyedStore,
}

impl<'a> Drafts<'a> {
    pub(crate) fn new(store: &'a KeyedStore) -> Self {
        Drafts { store }
    }

    /// Saves `data` as the draft for `form`, replacing any earlier one.
    pub fn save<T: Serialize + ?Sized>(&self, form: &str, data: &T) -> bool {
        report("save_draft", form, self.try_save(form, data))
    }

    pub fn try_save<T: Serialize + ?Sized>(&self, form: &str, data: &T) -> StoreResult<()> {
        let draft = Draft {
            data: serde_json::to_value(data)?,
            saved_at: self.store.clock().now(),
        };
        let draft = serde_json::to_value(draft)?;

        update_json::<DraftMap, _>(self.store.local(), DRAFTS_KEY, |current| {
            let mut drafts = current.unwrap_or_default();
            drafts.insert(form.to_string(), draft);
            Some(drafts)
        })
    }

    /// The data of the draft for `form`, if there is one of type `T`.
    pub fn get<T: DeserializeOwned>(&self, form: &str) -> Option<T> {
        self.entry(form)
            .and_then(|draft| serde_json::from_value(draft.data).ok())
    }

    /// The full draft for `form`, including when it was saved.
    pub fn entry(&self, form: &str) -> Option<Draft> {
        self.all()
            .remove(form)
            .and_then(|raw| serde_json::from_value(raw).ok())
    }

    pub fn saved_at(&self, form: &str) -> Option<DateTime<Utc>> {
        self.entry(form).map(|draft| draft.saved_at)
    }

    pub fn remove(&self, form: &str) -> bool {
        let result = update_json::<DraftMap, _>(self.store.local(), DRAFTS_KEY, |current| {
            let mut drafts = current.unwrap_or_default();
            drafts.remove(form);
            Some(drafts)
        });
        report("remove_draft", form, result)
    }

    /// True if `form` has a readable draft, i.e. exactly when
    /// [`Drafts::entry`] returns one.
    pub fn has(&self, form: &str) -> bool {
        self.entry(form).is_some()
    }

    /// Names of every form with a readable draft.
    pub fn list(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|(_, raw)| Draft::deserialize(raw).is_ok())
            .map(|(form, _)| form)
            .collect()
    }

    fn all(&self) -> DraftMap {
        read_or_none(self.store.local(), DRAFTS_KEY).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_save_overwrites() {
        let store = KeyedStore::in_memory();
        let drafts = store.drafts();

        drafts.save("f", &json!({"a": 1}));
        drafts.save("f", &json!({"a": 2}));

        assert_eq!(drafts.get::<Value>("f"), Some(json!({"a": 2})));
        assert_eq!(drafts.list(), vec!["f".to_string()]);
    }

    #[test]
    fn test_saved_at_uses_store_clock() {
        // 2026-03-05T00:00:00Z
        let clock = Arc::new(ManualClock::new(1_772_668_800_000));
        let store = KeyedStore::in_memory().with_clock(clock);

        store.drafts().save("order-form", &json!({"customer": "C-9"}));

        let raw: Value = store.get(DRAFTS_KEY, Value::Null);
        assert_eq!(raw["order-form"]["savedAt"], "2026-03-05T00:00:00Z");
        assert_eq!(
            store.drafts().saved_at("order-form").map(|t| t.timestamp_millis()),
            Some(1_772_668_800_000)
        );
    }

    #[test]
    fn test_remove_and_has() {
        let store = KeyedStore::in_memory();
        let drafts = store.drafts();

        drafts.save("customer-form", &json!({"phone": "0901234567"}));
        drafts.save("order-form", &json!({}));
        assert!(drafts.has("customer-form"));

        assert!(drafts.remove("customer-form"));
        assert!(!drafts.has("customer-form"));
        assert_eq!(drafts.get::<Value>("customer-form"), None);
        assert!(drafts.has("order-form"));
    }

    #[test]
    fn test_unreadable_draft_is_not_reported() {
        let store = KeyedStore::in_memory();
        store.set(
            DRAFTS_KEY,
            &json!({
                "bad-date": {"data": {"a": 1}, "savedAt": "yesterday"},
                "no-date": {"data": {"a": 2}},
                "ok": {"data": {"a": 3}, "savedAt": "2026-03-05T08:30:00Z"}
            }),
        );
        let drafts = store.drafts();

        for form in ["bad-date", "no-date"] {
            assert!(!drafts.has(form));
            assert_eq!(drafts.get::<Value>(form), None);
            assert_eq!(drafts.saved_at(form), None);
        }
        assert!(drafts.has("ok"));
        assert_eq!(drafts.list(), vec!["ok".to_string()]);

        // Saving over a bad entry makes it readable again
        drafts.save("bad-date", &json!({"a": 4}));
        assert!(drafts.has("bad-date"));
        assert_eq!(drafts.get::<Value>("bad-date"), Some(json!({"a": 4})));
    }

    #[test]
    fn test_reads_drafts_written_by_the_web_client() {
        let store = KeyedStore::in_memory();
        store.set(
            DRAFTS_KEY,
            &json!({"f": {"data": {"a": 1}, "savedAt": "2026-03-05T08:30:00.123Z"}}),
        );

        assert_eq!(store.drafts().get::<Value>("f"), Some(json!({"a": 1})));
    }
}
