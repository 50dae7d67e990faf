//! Tracing/logging setup shared by ledger hosts and test harnesses.

/// Initialize process-wide tracing/logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
