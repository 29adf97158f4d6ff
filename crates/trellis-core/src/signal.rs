//! Signal/slot notifications for Trellis widgets.
//!
//! Widgets expose their notifications (selection changed, double click, drop
//! occurred, ...) as public [`Signal`] fields. Slots are invoked synchronously
//! on the emitting thread, which for widgets is always the UI thread.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let selection_changed = Signal::<()>::new();
//! let conn_id = selection_changed.connect(|_| {
//!     println!("selection changed");
//! });
//!
//! selection_changed.emit(());
//! selection_changed.disconnect(conn_id);
//! ```
//!
//! # Panics in slots
//!
//! Each slot runs inside [`call_guarded`](crate::call_guarded). A panicking
//! slot is logged and skipped; the remaining slots still run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::recover::call_guarded;

new_key_type! {
    /// Handle for one connected slot, used to disconnect it.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification with any number of connected slots.
///
/// `Args` is what each slot receives by reference: `()` for plain
/// notifications, a value or tuple otherwise.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> Signal<Args> {
    /// Whether [`emit`](Self::emit) is currently a no-op.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Suppress emission until unblocked. Slots stay connected.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::Release);
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Remove one slot. Returns whether it was still connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect `slot`; it runs on every later [`emit`](Self::emit).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Run every connected slot with `args`, in connection order.
    ///
    /// The slot list is copied out before any slot runs, so slots may
    /// connect or disconnect on this signal.
    #[tracing::instrument(skip_all, target = "trellis_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "trellis_core::signal", "blocked");
            return;
        }
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: "trellis_core::signal", slots = slots.len(), "emit");
        for slot in &slots {
            // A failed slot is already logged by the guard.
            let _ = call_guarded("signal slot", || slot(&args));
        }
    }
}
