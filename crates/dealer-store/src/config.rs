//! # Store Configuration
//!
//! Configuration for the keyed store and the defaults the admin pages read
//! from it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DEALER_STORE_PATH=/var/lib/dealer/store.json                       │
//! │     DEALER_CACHE_TTL_MS=600000                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dealer-admin/store.toml (Linux)                          │
//! │     ~/Library/Application Support/vn.dealer.admin/store.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! path = "/var/lib/dealer/store.json"
//! quota_chars = 5242880
//! session_quota_chars = 5242880
//!
//! [limits]
//! cache_ttl_ms = 3600000
//! recent_items_max = 10
//! search_history_max = 20
//!
//! [calculation]
//! default_vat_rate_percent = 10.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use dealer_core::calculation;
use dealer_core::validation::validate_vat_rate;
use dealer_core::{
    LineItem, Totals, DEFAULT_CACHE_TTL_MS, DEFAULT_RECENT_ITEMS_MAX, DEFAULT_SEARCH_HISTORY_MAX,
    DEFAULT_VAT_RATE_PERCENT,
};

use crate::error::{StoreError, StoreResult};

/// Roughly what browsers grant a single origin (5 MiB of characters).
const DEFAULT_QUOTA_CHARS: usize = 5 * 1024 * 1024;

// =============================================================================
// Storage Settings
// =============================================================================

/// Where and how much to store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path of the persistent store file. Defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Capacity of the persistent store, in characters.
    #[serde(default = "default_quota")]
    pub quota_chars: usize,

    /// Capacity of the session store, in characters.
    #[serde(default = "default_quota")]
    pub session_quota_chars: usize,
}

fn default_quota() -> usize {
    DEFAULT_QUOTA_CHARS
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            path: None,
            quota_chars: default_quota(),
            session_quota_chars: default_quota(),
        }
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Caps and lifetimes for the derived namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLimits {
    /// Lifetime of cached API responses (milliseconds).
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Length cap of each recent-items list.
    #[serde(default = "default_recent_items_max")]
    pub recent_items_max: usize,

    /// Length cap of the search history.
    #[serde(default = "default_search_history_max")]
    pub search_history_max: usize,
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS as u64
}

fn default_recent_items_max() -> usize {
    DEFAULT_RECENT_ITEMS_MAX
}

fn default_search_history_max() -> usize {
    DEFAULT_SEARCH_HISTORY_MAX
}

impl Default for StoreLimits {
    fn default() -> Self {
        StoreLimits {
            cache_ttl_ms: default_cache_ttl_ms(),
            recent_items_max: default_recent_items_max(),
            search_history_max: default_search_history_max(),
        }
    }
}

impl StoreLimits {
    /// Cache lifetime as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

// =============================================================================
// Calculation Settings
// =============================================================================

/// Defaults the order and invoice forms start from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationSettings {
    /// VAT rate pre-filled on new orders and invoices (percent).
    #[serde(default = "default_vat_rate")]
    pub default_vat_rate_percent: f64,
}

fn default_vat_rate() -> f64 {
    DEFAULT_VAT_RATE_PERCENT
}

impl Default for CalculationSettings {
    fn default() -> Self {
        CalculationSettings {
            default_vat_rate_percent: default_vat_rate(),
        }
    }
}

impl CalculationSettings {
    /// Purchase-order totals at the configured VAT rate.
    pub fn order_totals(
        &self,
        items: &[LineItem],
        discount_rate_percent: f64,
        discount_amount: f64,
    ) -> Totals {
        calculation::order_totals(
            items,
            self.default_vat_rate_percent,
            discount_rate_percent,
            discount_amount,
        )
    }

    /// Sales-invoice totals at the configured VAT rate.
    pub fn invoice_totals(
        &self,
        items: &[LineItem],
        discount_rate_percent: f64,
        discount_amount: f64,
    ) -> Totals {
        calculation::invoice_totals(
            items,
            self.default_vat_rate_percent,
            discount_rate_percent,
            discount_amount,
        )
    }
}

// =============================================================================
// Main Store Configuration
// =============================================================================

/// Complete store configuration.
///
/// ## Example
/// ```rust
/// use dealer_store::StoreConfig;
///
/// let config = StoreConfig::default()
///     .storage_path("/tmp/dealer/store.json")
///     .recent_items_max(15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub limits: StoreLimits,

    #[serde(default)]
    pub calculation: CalculationSettings,
}

impl StoreConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the persistent store path.
    pub fn storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.path = Some(path.into());
        self
    }

    /// Sets the persistent store capacity.
    pub fn quota_chars(mut self, quota: usize) -> Self {
        self.storage.quota_chars = quota;
        self
    }

    /// Sets the cache lifetime.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.limits.cache_ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the recent-items cap.
    pub fn recent_items_max(mut self, max: usize) -> Self {
        self.limits.recent_items_max = max;
        self
    }

    /// Sets the search-history cap.
    pub fn search_history_max(mut self, max: usize) -> Self {
        self.limits.search_history_max = max;
        self
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.limits.cache_ttl_ms == 0 {
            return Err(StoreError::InvalidConfig(
                "cache_ttl_ms must be greater than 0".into(),
            ));
        }

        if self.limits.recent_items_max == 0 {
            return Err(StoreError::InvalidConfig(
                "recent_items_max must be greater than 0".into(),
            ));
        }

        if self.limits.search_history_max == 0 {
            return Err(StoreError::InvalidConfig(
                "search_history_max must be greater than 0".into(),
            ));
        }

        if self.storage.quota_chars == 0 || self.storage.session_quota_chars == 0 {
            return Err(StoreError::InvalidConfig(
                "storage quotas must be greater than 0".into(),
            ));
        }

        validate_vat_rate(self.calculation.default_vat_rate_percent)
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies `DEALER_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DEALER_STORE_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup("DEALER_STORE_QUOTA") {
            match raw.parse() {
                Ok(quota) => self.storage.quota_chars = quota,
                Err(_) => warn!(value = %raw, "Ignoring invalid DEALER_STORE_QUOTA"),
            }
        }

        if let Some(raw) = lookup("DEALER_CACHE_TTL_MS") {
            match raw.parse() {
                Ok(ttl) => self.limits.cache_ttl_ms = ttl,
                Err(_) => warn!(value = %raw, "Ignoring invalid DEALER_CACHE_TTL_MS"),
            }
        }

        if let Some(raw) = lookup("DEALER_RECENT_MAX") {
            match raw.parse() {
                Ok(max) => self.limits.recent_items_max = max,
                Err(_) => warn!(value = %raw, "Ignoring invalid DEALER_RECENT_MAX"),
            }
        }

        if let Some(raw) = lookup("DEALER_SEARCH_HISTORY_MAX") {
            match raw.parse() {
                Ok(max) => self.limits.search_history_max = max,
                Err(_) => warn!(value = %raw, "Ignoring invalid DEALER_SEARCH_HISTORY_MAX"),
            }
        }

        if let Some(raw) = lookup("DEALER_VAT_RATE") {
            match raw.parse() {
                Ok(rate) => self.calculation.default_vat_rate_percent = rate,
                Err(_) => warn!(value = %raw, "Ignoring invalid DEALER_VAT_RATE"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("vn", "dealer", "admin")
            .map(|dirs| dirs.config_dir().join("store.toml"))
    }

    /// Resolved path of the persistent store file.
    pub fn resolved_storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(|| {
            directories::ProjectDirs::from("vn", "dealer", "admin")
                .map(|dirs| dirs.data_dir().join("store.json"))
        })
    }
}
