//! # dealer-store: Keyed Store for the Dealership Admin
//!
//! Structured, namespaced JSON storage over a synchronous string-keyed
//! backend, with TTL entries and a session-scoped mirror.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dealer Admin Data Flow                           │
//! │                                                                         │
//! │  Admin page (save draft, remember filters, cache a response)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  dealer-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  KeyedStore   │    │  Namespaces   │    │   Backends   │  │   │
//! │  │   │  (store.rs)   │    │ (namespace/)  │    │  (backend/)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ JSON get/set  │◄───│ Drafts        │    │ FileStorage  │  │   │
//! │  │   │ TTL entries   │    │ RecentItems   │───►│ MemoryStorage│  │   │
//! │  │   │ export/import │    │ Cache ...     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     store.json                                  │   │
//! │  │   ~/.local/share/admin/store.json (Linux)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - [`KeyedStore`]: JSON values, TTL entries, introspection
//! - [`namespace`] - Preferences, drafts, recent items, search history,
//!   table settings, filters, cache, session
//! - [`backend`] - The [`StorageBackend`] trait and its implementations
//! - [`config`] - TOML + environment configuration
//! - [`clock`] - Injectable time source
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dealer_store::{KeyedStore, StoreConfig};
//! use serde_json::json;
//!
//! dealer_store::telemetry::init_tracing();
//!
//! let config = StoreConfig::load_or_default(None);
//! let store = KeyedStore::open_or_in_memory(&config);
//!
//! store.drafts().save("order-form", &json!({"customerId": "C-12"}));
//! store.filters().save("invoices", &json!({"status": "overdue"}));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod namespace;
pub mod store;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{FileStorage, MemoryStorage, StorageBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CalculationSettings, StorageSettings, StoreConfig, StoreLimits};
pub use error::{StoreError, StoreResult};
pub use namespace::Draft;
pub use store::KeyedStore;
