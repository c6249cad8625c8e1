//! Tracing initialization for embedders.

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Default level is INFO; override with `RUST_LOG` (e.g.
/// `RUST_LOG=brew_pos=debug,sqlx=warn`). Safe to call more than once - the
/// second initialization is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    info!("Tracing initialized");
}
