//! Tracing/logging initialization.
//!
//! The engine emits structured events on the interesting paths (transfer
//! commits and rollbacks, reference deletions, negative-balance warnings);
//! this module wires them to a JSON subscriber configurable via `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
