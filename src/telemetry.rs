//! Tracing subscriber setup for embedders, binaries, and tests.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global tracing subscriber.
///
/// Filtering follows `RUST_LOG` when set and defaults to `info`. Calling
/// this more than once is harmless: later calls are no-ops, which keeps
/// it usable from individual tests.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
