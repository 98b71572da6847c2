//! Tracing initialization for embedders and tests.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes a global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` with debug
/// output for this crate. Call once from the embedding application;
/// repeated calls (as happens across tests) are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,gridseek=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
