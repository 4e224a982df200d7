// Shared helpers for the integration tests.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a `RUST_LOG`-filtered fmt subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::from_default_env();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}
