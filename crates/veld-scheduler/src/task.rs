//! A scheduled unit of deferred work.

use std::any::Any;
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// The callable body of a task. Takes no arguments and returns nothing;
/// anything the job needs it captures at registration time.
pub(crate) type Job = Box<dyn FnMut() + Send + 'static>;

/// A scheduled task: a callable, its next execution time, an optional
/// repeat interval, and a name for diagnostics.
///
/// Tasks order by next execution time, inverted so that a max-heap
/// surfaces the earliest deadline first. Ties between simultaneously
/// due tasks resolve in heap order, which is an accepted
/// non-determinism.
pub struct Task {
    job: Job,
    next: Instant,
    every: Duration,
    name: String,
}

impl Task {
    /// Construct a task. A zero `every` makes it one-shot.
    pub(crate) fn new(job: Job, next: Instant, every: Duration, name: String) -> Self {
        Self {
            job,
            next,
            every,
            name,
        }
    }

    /// The task's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the task is next due.
    pub fn next_at(&self) -> Instant {
        self.next
    }

    /// Run the task body and reschedule if recurring.
    ///
    /// Returns `true` when the task should be re-inserted into the
    /// queue. Recurring tasks rebase from the firing instant, never
    /// from the previous deadline, so a stalled scheduler does not
    /// replay missed firings in a burst.
    ///
    /// A panicking body is caught and logged here; one failing
    /// background job must never stop the scheduler. The task is still
    /// rescheduled if recurring, so a transiently bad job does not go
    /// permanently dead.
    pub(crate) fn fire(&mut self, fired_at: Instant) -> bool {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (self.job)())) {
            tracing::error!(
                task = %self.name,
                "scheduled task panicked: {}",
                panic_message(&*payload)
            );
        }
        if self.every.is_zero() {
            false
        } else {
            self.next = fired_at + self.every;
            true
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.next == other.next
    }
}

impl Eq for Task {}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted: the earliest deadline is the greatest element.
        other.next.cmp(&self.next)
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
