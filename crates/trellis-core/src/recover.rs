//! Panic containment for caller-supplied callbacks.
//!
//! Everything the toolkit invokes on behalf of user code (signal slots, cell
//! handlers, drag predicates, queued tasks) goes through [`call_guarded`] so a
//! misbehaving callback is logged instead of unwinding through the event loop.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::error::{Result, TrellisError};

/// Extract a printable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `f`, converting a panic into [`TrellisError::CallbackPanicked`].
///
/// The panic is logged at error level under the `trellis_core::recover`
/// target. State mutated by `f` before it panicked is not rolled back.
pub fn call_guarded<R>(context: &'static str, f: impl FnOnce() -> R) -> Result<R> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(
            target: "trellis_core::recover",
            context,
            panic = %message,
            "callback panicked"
        );
        TrellisError::CallbackPanicked { context, message }
    })
}

/// Like [`call_guarded`], but substitutes `fallback` when the callback panics.
pub fn call_guarded_or<R>(context: &'static str, fallback: R, f: impl FnOnce() -> R) -> R {
    call_guarded(context, f).unwrap_or(fallback)
}
