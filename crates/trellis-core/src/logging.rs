//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis=debug,trellis_core=info")
//!     .init();
//! ```

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// Row cache rebuild span.
    pub const ROW_CACHE: &str = "trellis::row_cache";
    /// Column fit span.
    pub const COLUMN_FIT: &str = "trellis::column_fit";
    /// Table paint pass span.
    pub const PAINT: &str = "trellis::paint";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Task queue target.
    pub const TASK: &str = "trellis_core::task";
    /// Delayed task scheduler target.
    pub const SCHEDULER: &str = "trellis_core::scheduler";
    /// Panic recovery target.
    pub const RECOVER: &str = "trellis_core::recover";
    /// Table widget target.
    pub const TABLE: &str = "trellis::table";
    /// Drag and drop target.
    pub const DRAG_DROP: &str = "trellis::drag_drop";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing the expensive passes (cache rebuild, column fit).
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// Thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! trellis_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "trellis_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! trellis_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "trellis_core", $($arg)*)
    };
}
