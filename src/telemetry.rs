//! Tracing subscriber setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Install a formatted stdout subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it is set. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
