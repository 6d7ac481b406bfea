//! Opt-in tracing setup for embedding applications.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a fmt subscriber honoring `RUST_LOG`.
///
/// Call once at startup. Safe to call again (later calls are no-ops), so
/// tests and examples can share it.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("toolbay_client=debug,toolbay_gateway=debug,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
