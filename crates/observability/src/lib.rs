//! Process-wide logging setup shared by the binaries.

/// Initialize structured logging for the process.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    tracing::init(DEFAULT_FILTER);
}

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,autoreply_infra=debug";

/// Subscriber construction (filters, JSON formatting).
pub mod tracing;
