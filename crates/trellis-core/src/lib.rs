//! Core systems for Trellis.
//!
//! This crate provides the UI-thread plumbing the Trellis widgets build on:
//!
//! - **Signal/Slot System**: Type-safe notifications emitted by widgets
//! - **Dispatcher**: FIFO task queue plus delayed one-shot scheduling,
//!   drained by the host event loop
//! - **Recovery**: Panic containment for caller-supplied callbacks
//! - **Logging**: `tracing` targets, span names and helper macros
//!
//! # Debounce Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//! use trellis_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! let scheduled = Arc::new(AtomicBool::new(false));
//!
//! for _ in 0..10 {
//!     if !scheduled.swap(true, Ordering::SeqCst) {
//!         let flag = scheduled.clone();
//!         dispatcher.invoke_after(Duration::from_millis(20), move || {
//!             flag.store(false, Ordering::SeqCst);
//!         });
//!     }
//! }
//! assert_eq!(dispatcher.scheduled_count(), 1);
//! ```

mod dispatcher;
mod error;
pub mod logging;
mod recover;
mod scheduler;
pub mod signal;
mod task;

pub use dispatcher::Dispatcher;
pub use error::{Result, SchedulerError, TrellisError};
pub use logging::PerfSpan;
pub use recover::{call_guarded, call_guarded_or, panic_message};
pub use scheduler::{ScheduledTaskId, TaskScheduler};
pub use signal::{ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};

static_assertions::assert_impl_all!(Dispatcher: Send, Sync, Clone);
static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
