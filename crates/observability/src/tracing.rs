//! JSON log output filtered through `RUST_LOG`.
//!
//! The reply worker logs with structured fields (`job`, `post_id`, `model`,
//! `status`), so output stays machine readable.

use tracing_subscriber::EnvFilter;

/// Build the env filter, falling back to `default_directives`.
pub fn filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Install the global JSON subscriber.
pub fn init(default_directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_directives))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(false)
        .with_target(true)
        .try_init();
}
