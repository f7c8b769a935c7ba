//! # Namespaces
//!
//! Repository-style views over a [`KeyedStore`](crate::KeyedStore), one per
//! kind of UI state. Each borrows the store and is cheap to create:
//!
//! ```rust
//! use dealer_store::KeyedStore;
//! use serde_json::json;
//!
//! let store = KeyedStore::in_memory();
//! store.drafts().save("customer-form", &json!({"name": "Nguyễn Văn A"}));
//! store.recent().add("motorbikes", &json!({"id": "MB-01", "model": "Air Blade"}));
//! assert!(store.drafts().has("customer-form"));
//! ```
//!
//! ## Storage Keys
//! ```text
//! ┌──────────────────┬───────────────────────────┬──────────────────────────┐
//! │ Namespace        │ Key                       │ Shape                    │
//! ├──────────────────┼───────────────────────────┼──────────────────────────┤
//! │ preferences()    │ userPreferences           │ { name: value }          │
//! │ drafts()         │ formDrafts                │ { form: {data, savedAt} }│
//! │ recent()         │ recent_<category>         │ [ item, ... ]            │
//! │ search_history() │ searchHistory             │ [ query, ... ]           │
//! │ table_settings() │ tableSettings             │ { tableId: settings }    │
//! │ filters()        │ filters_<pageId>          │ filters                  │
//! │ cache()          │ cache_<key>               │ { value, expiry }        │
//! │ session()        │ any key, session backend  │ value                    │
//! └──────────────────┴───────────────────────────┴──────────────────────────┘
//! ```
//!
//! Every read-modify-write of a shared key goes through
//! [`StorageBackend::update`](crate::StorageBackend::update), so concurrent
//! writers cannot lose each other's changes.

mod cache;
mod drafts;
mod preferences;
mod recent;
mod search_history;
mod session;
mod settings;

pub use cache::{Cache, CACHE_KEY_PREFIX};
pub use drafts::{Draft, Drafts, DRAFTS_KEY};
pub use preferences::{Preferences, PREFERENCES_KEY};
pub use recent::{RecentItems, RECENT_KEY_PREFIX};
pub use search_history::{SearchHistory, SEARCH_HISTORY_KEY};
pub use session::SessionScope;
pub use settings::{Filters, TableSettings, FILTERS_KEY_PREFIX, TABLE_SETTINGS_KEY};
