//! UI-thread dispatcher: a FIFO task queue plus a delayed-task scheduler.
//!
//! The host event loop drains the dispatcher once per iteration with
//! [`Dispatcher::process_next`] (or [`Dispatcher::run_pending`]). Widgets
//! receive a [`Dispatcher`] handle at construction; when none is given they
//! fall back to the process-wide instance returned by [`Dispatcher::global`].
//!
//! ```
//! use std::time::Duration;
//! use trellis_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.invoke(|| println!("next iteration"));
//! dispatcher.invoke_after(Duration::from_millis(20), || println!("a bit later"));
//!
//! // Inside the host loop:
//! while dispatcher.process_next() {}
//! ```

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::Result;
use crate::scheduler::{ScheduledTaskId, TaskScheduler};
use crate::task::{TaskId, TaskQueue, run_task};

static GLOBAL_DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

type Waker = Arc<dyn Fn() + Send + Sync>;

struct DispatcherInner {
    queue: Mutex<TaskQueue>,
    scheduler: Mutex<TaskScheduler>,
    waker: Mutex<Option<Waker>>,
}

/// A cloneable handle to a UI-thread task queue.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("queued", &self.queued_count())
            .field("scheduled", &self.scheduled_count())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create an isolated dispatcher.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                queue: Mutex::new(TaskQueue::new()),
                scheduler: Mutex::new(TaskScheduler::new()),
                waker: Mutex::new(None),
            }),
        }
    }

    /// The process-wide dispatcher, created on first use.
    pub fn global() -> &'static Dispatcher {
        GLOBAL_DISPATCHER.get_or_init(Dispatcher::new)
    }

    /// Whether two handles refer to the same queue.
    pub fn same_queue(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Install a callback used to wake the host event loop when work arrives.
    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.inner.waker.lock() = Some(Arc::new(waker));
    }

    fn wake(&self) {
        let waker = self.inner.waker.lock().clone();
        if let Some(waker) = waker {
            let _ = crate::recover::call_guarded("dispatcher waker", || waker());
        }
    }

    // -------------------------------------------------------------------------
    // Posting
    // -------------------------------------------------------------------------

    /// Queue `task` to run on a later iteration of the host loop.
    pub fn invoke<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.inner.queue.lock().post(task);
        self.wake();
        id
    }

    /// Queue `task` once `delay` has elapsed.
    pub fn invoke_after<F>(&self, delay: Duration, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.inner.scheduler.lock().schedule_once(delay, task);
        tracing::trace!(target: "trellis_core::scheduler", ?id, ?delay, "task scheduled");
        self.wake();
        id
    }

    /// Cancel a task queued with [`invoke`](Self::invoke).
    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.queue.lock().cancel(id)
    }

    /// Cancel a task scheduled with [`invoke_after`](Self::invoke_after).
    pub fn cancel_scheduled(&self, id: ScheduledTaskId) -> Result<()> {
        self.inner.scheduler.lock().cancel(id)
    }

    // -------------------------------------------------------------------------
    // Draining
    // -------------------------------------------------------------------------

    /// Move every delayed task whose deadline has passed onto the FIFO.
    pub fn pump_scheduled(&self) -> usize {
        let ready = self.inner.scheduler.lock().take_ready(Instant::now());
        let count = ready.len();
        if count > 0 {
            crate::trellis_trace!(count, "moving due tasks onto the queue");
            let mut queue = self.inner.queue.lock();
            for task in ready {
                queue.post_boxed(task);
            }
        }
        count
    }

    /// Run the next queued task, if any. Returns `false` when nothing ran.
    ///
    /// The queue lock is released before the task runs, so tasks may post
    /// further work.
    pub fn process_next(&self) -> bool {
        self.pump_scheduled();
        let next = self.inner.queue.lock().pop();
        match next {
            Some((id, task)) => {
                run_task(id, task);
                true
            }
            None => false,
        }
    }

    /// Run every task that is due right now. Work posted by those tasks is
    /// left for the next call. Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        self.pump_scheduled();
        let count = self.queued_count();
        let mut ran = 0;
        while ran < count && self.process_next() {
            ran += 1;
        }
        ran
    }

    /// Time until the earliest delayed task becomes due.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.inner.scheduler.lock().time_until_next()
    }

    /// Number of tasks waiting on the FIFO.
    pub fn queued_count(&self) -> usize {
        self.inner.queue.lock().pending_count()
    }

    /// Number of delayed tasks whose deadline has not yet passed.
    pub fn scheduled_count(&self) -> usize {
        self.inner.scheduler.lock().pending_count()
    }

    /// Whether any work is queued or scheduled.
    pub fn is_idle(&self) -> bool {
        self.queued_count() == 0 && self.scheduled_count() == 0
    }
}
