//! Tracing setup for binaries and tools embedding the store.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! embedding application's call.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,dealer_store=debug,dealer_core=debug";

/// Installs a formatted subscriber filtered by `RUST_LOG`.
///
/// Calling it again (or after another subscriber is installed) is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing();
        init_tracing();
        tracing::debug!("tracing initialised");
    }
}
