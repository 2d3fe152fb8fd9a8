//! Logging initialisation.
//!
//! Human-readable lines (timestamp, level, message) on stderr so the prompts
//! on stdout stay readable. `RUST_LOG` overrides the configured level.

use tracing_subscriber::EnvFilter;

pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
