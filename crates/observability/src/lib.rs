//! Process-wide tracing setup.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize tracing with the filter taken from `RUST_LOG`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(None);
}

/// Like [`init`], but an explicit filter directive wins over `RUST_LOG`.
pub fn init_with(filter: Option<&str>) {
    tracing::init(filter);
}
