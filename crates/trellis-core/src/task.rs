//! FIFO task queue drained by the UI thread.
//!
//! Tasks run one at a time in posting order, each inside a panic-recovery
//! boundary: a failing task is logged and the queue keeps draining.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::recover::call_guarded;

/// Handle for a queued task, used to cancel it before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

pub(crate) type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// Tasks waiting to run, oldest first.
#[derive(Default)]
pub struct TaskQueue {
    tasks: VecDeque<(TaskId, BoxedTask)>,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue").field("pending", &self.tasks.len()).finish()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` behind everything already posted.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_boxed(Box::new(task))
    }

    pub(crate) fn post_boxed(&mut self, task: BoxedTask) -> TaskId {
        let id = TaskId::next();
        self.tasks.push_back((id, task));
        id
    }

    /// Drop a task that has not run yet. Returns whether it was queued.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(queued, _)| *queued != id);
        self.tasks.len() != before
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take the oldest task without running it.
    pub(crate) fn pop(&mut self) -> Option<(TaskId, BoxedTask)> {
        self.tasks.pop_front()
    }

    /// Run the oldest task. Returns `false` when the queue was empty.
    pub fn process_next(&mut self) -> bool {
        match self.pop() {
            Some((id, task)) => {
                run_task(id, task);
                true
            }
            None => false,
        }
    }
}

/// Run one task inside the recovery boundary.
pub(crate) fn run_task(id: TaskId, task: BoxedTask) {
    tracing::trace!(target: "trellis_core::task", id = id.as_u64(), "running task");
    if call_guarded("queued task", task).is_err() {
        tracing::warn!(target: "trellis_core::task", id = id.as_u64(), "task failed; queue continues");
    }
}
