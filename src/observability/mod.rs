//! # Observability
//!
//! Structured logging for the certflow pipeline using the tracing
//! ecosystem. Every pipeline step emits a log line so an operator can
//! audit a full run from the output alone.

mod logging;

pub use logging::log_settings_info;

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` when unset.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
