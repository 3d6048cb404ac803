//! Tracing initialisation for the binary.

use tracing_subscriber::EnvFilter;

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// Defaults to `warn` so fallback warnings (unknown currency, missing rate)
/// show up without drowning the interactive prompts. Calling it twice is a
/// no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
