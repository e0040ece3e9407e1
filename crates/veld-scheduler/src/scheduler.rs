//! The deadline-ordered scheduler and its wake signal.

use std::collections::BinaryHeap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::task::Task;

/// A thread-safe scheduler for executing callables at specific times or
/// intervals.
///
/// Tasks may be registered from any thread; execution happens only
/// inside [`run_once`](Scheduler::run_once), which the simulation
/// thread calls with a bounded timeout. The wake signal is a
/// capacity-one channel: registering a task or calling
/// [`signal_urgent`](Scheduler::signal_urgent) wakes a blocked
/// `run_once` immediately, and redundant signals coalesce into a single
/// pending token.
///
/// The heap is only locked to push and pop; task bodies run with no
/// lock held.
pub struct Scheduler {
    tasks: Mutex<BinaryHeap<Task>>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Scheduler {
    /// Construct an empty scheduler.
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            tasks: Mutex::new(BinaryHeap::new()),
            wake_tx,
            wake_rx,
        }
    }

    /// Schedule `job` to run once, `delay` from now.
    ///
    /// A zero delay means "as soon as the scheduler next runs".
    pub fn add_oneshot<F>(&self, job: F, delay: Duration, name: &str)
    where
        F: FnMut() + Send + 'static,
    {
        self.insert(Task::new(
            Box::new(job),
            Instant::now() + delay,
            Duration::ZERO,
            name.to_string(),
        ));
    }

    /// Schedule `job` to run repeatedly, `every` apart.
    ///
    /// With `start_immediately` the first firing is due at once;
    /// otherwise it is one full interval away.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero; a zero-interval recurring task would
    /// spin the scheduler.
    pub fn add_recurring<F>(&self, job: F, every: Duration, name: &str, start_immediately: bool)
    where
        F: FnMut() + Send + 'static,
    {
        let now = Instant::now();
        let first = if start_immediately { now } else { now + every };
        self.add_recurring_at(job, every, first, name);
    }

    /// Schedule `job` to run repeatedly with an explicit first deadline.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero.
    pub fn add_recurring_at<F>(&self, job: F, every: Duration, first: Instant, name: &str)
    where
        F: FnMut() + Send + 'static,
    {
        assert!(!every.is_zero(), "recurring interval must be non-zero");
        self.insert(Task::new(Box::new(job), first, every, name.to_string()));
    }

    /// Wake a blocked [`run_once`](Scheduler::run_once) immediately.
    ///
    /// Used when an external event (a player command arriving on a
    /// network thread) should be handled with minimal latency even
    /// though no timer has elapsed. Safe to call from any thread, any
    /// number of times; signals coalesce.
    pub fn signal_urgent(&self) {
        let _ = self.wake_tx.try_send(());
    }

    /// Run one scheduler iteration.
    ///
    /// Blocks until the earliest pending task is due, an urgent signal
    /// arrives, or `max_timeout` elapses, whichever is first — then
    /// fires every task whose deadline has passed. A wakeup with
    /// nothing due (urgent signal, new-task signal, or a spurious one)
    /// simply returns after the re-check.
    pub fn run_once(&self, max_timeout: Duration) {
        let wait = match self.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(max_timeout),
            None => max_timeout,
        };
        if !wait.is_zero() {
            let _ = self.wake_rx.recv_timeout(wait);
        }
        self.execute_due();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push a task and wake any blocked consumer so it re-computes its
    /// wait against the possibly-earlier deadline.
    fn insert(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
        let _ = self.wake_tx.try_send(());
    }

    /// Earliest pending deadline, if any.
    fn next_deadline(&self) -> Option<Instant> {
        self.tasks.lock().unwrap().peek().map(Task::next_at)
    }

    /// Pop and fire every task whose deadline has passed, re-inserting
    /// recurring ones. The lock is released around each firing.
    fn execute_due(&self) {
        loop {
            let due = {
                let mut tasks = self.tasks.lock().unwrap();
                let head_due = tasks
                    .peek()
                    .is_some_and(|head| head.next_at() <= Instant::now());
                if head_due {
                    tasks.pop()
                } else {
                    None
                }
            };
            let Some(mut task) = due else { break };
            if task.fire(Instant::now()) {
                self.tasks.lock().unwrap().push(task);
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
