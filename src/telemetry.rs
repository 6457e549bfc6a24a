//! Optional `tracing-subscriber` setup for binaries embedding the engine.

use tracing_subscriber::EnvFilter;

/// Installs a global formatter filtered by `RUST_LOG` (default `info`).
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
