//! # Store Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / quota check                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← returned by backends and try_* methods     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  KeyedStore public API ← logs with tracing::warn!, returns false or    │
//! │                          the caller's default. NEVER propagates.       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would push the store past its capacity.
    ///
    /// ## When This Occurs
    /// - Large drafts or cached responses on a nearly full store
    /// - A quota configured lower than the data already present
    #[error("Storage quota exceeded: {needed} characters needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// A value could not be turned into JSON or back.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The storage medium could not be read or written.
    ///
    /// ## When This Occurs
    /// - Storage file not writable (permissions, read-only mount)
    /// - Disk full
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// Storage is switched off (e.g. a private-browsing profile).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// An import snapshot was not a JSON object.
    #[error("Invalid import snapshot: {0}")]
    InvalidImport(String),

    /// Invalid store configuration.
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
