//! Shared tracing/logging setup for hosts and integration tests.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops, so every
/// integration test can call it without coordination.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, output format).
pub mod tracing;
