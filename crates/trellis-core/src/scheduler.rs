//! Delayed one-shot task scheduling.
//!
//! The scheduler only decides *when* a task becomes due. Due tasks are handed
//! back to the caller (the [`Dispatcher`](crate::Dispatcher)), which appends
//! them to the FIFO task queue so they run on the UI thread in order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};
use crate::task::BoxedTask;

new_key_type! {
    /// Handle for a delayed task, used to cancel it before it is due.
    pub struct ScheduledTaskId;
}

struct Pending {
    due: Instant,
    task: BoxedTask,
}

/// Heap entry. Ordered so the earliest deadline pops first, and tasks with
/// the same deadline pop in scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    due: Instant,
    seq: u64,
    id: ScheduledTaskId,
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Holds tasks until their deadline passes.
pub struct TaskScheduler {
    tasks: SlotMap<ScheduledTaskId, Pending>,
    queue: BinaryHeap<Deadline>,
    next_seq: u64,
}

impl TaskScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to become due after `delay`.
    pub fn schedule_once<F>(&mut self, delay: Duration, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_at(Instant::now() + delay, task)
    }

    /// Schedule `task` to become due at `instant`.
    pub fn schedule_at<F>(&mut self, instant: Instant, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.tasks.insert(Pending {
            due: instant,
            task: Box::new(task),
        });
        self.queue.push(Deadline {
            due: instant,
            seq: self.next_seq,
            id,
        });
        self.next_seq += 1;
        id
    }

    /// Cancel a task that has not yet become due.
    pub fn cancel(&mut self, id: ScheduledTaskId) -> Result<()> {
        if self.tasks.remove(id).is_some() {
            Ok(())
        } else {
            Err(SchedulerError::InvalidTaskId.into())
        }
    }

    /// Whether `id` is still waiting for its deadline.
    pub fn is_pending(&self, id: ScheduledTaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of tasks waiting for their deadline.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Pop heap entries whose task was cancelled.
    fn discard_cancelled(&mut self) {
        while self.queue.peek().is_some_and(|top| !self.tasks.contains_key(top.id)) {
            self.queue.pop();
        }
    }

    /// Time until the earliest pending task becomes due.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue
            .peek()
            .map(|top| top.due.saturating_duration_since(Instant::now()))
    }

    /// Whether at least one task is due now.
    pub fn has_ready(&mut self) -> bool {
        self.discard_cancelled();
        self.queue
            .peek()
            .is_some_and(|top| top.due <= Instant::now())
    }

    /// Remove and return every task whose deadline is at or before `now`,
    /// earliest first.
    #[tracing::instrument(skip(self), target = "trellis_core::scheduler", level = "trace")]
    pub(crate) fn take_ready(&mut self, now: Instant) -> Vec<BoxedTask> {
        let mut ready = Vec::new();
        while let Some(top) = self.queue.peek().copied() {
            if top.due > now {
                break;
            }
            self.queue.pop();
            if let Some(pending) = self.tasks.remove(top.id) {
                tracing::trace!(
                    target: "trellis_core::scheduler",
                    id = ?top.id,
                    late_by = ?now.saturating_duration_since(pending.due),
                    "scheduled task due"
                );
                ready.push(pending.task);
            }
        }
        ready
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}
