//! Cooperative timers for a single logical thread.
//!
//! A `Timers` arena holds labelled one-shot wake-ups on a private clock.
//! Periodic processes are written as loops that re-arm themselves after each
//! firing, the same shape as a coroutine that yields a wait and then acts:
//!
//! ```
//! use space_explorer::scheduler::Timers;
//!
//! let mut timers = Timers::new();
//! timers.after(1.0, "tick");
//!
//! let horizon = timers.now() + 2.5;
//! let mut fired = 0;
//! while let Some(task) = timers.poll_until(horizon) {
//!     fired += 1;
//!     timers.after(1.0, task.label); // relative to the firing instant
//! }
//! timers.settle(horizon);
//! assert_eq!(fired, 2);
//! ```
//!
//! Dropping the arena, or calling `cancel_all`, cancels everything it owns.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Clone, Debug)]
struct Pending<T> {
    id: TaskId,
    due: f64,
    label: T,
}

/// A wake-up handed back by `poll_until`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fired<T> {
    pub id: TaskId,
    pub due: f64,
    pub label: T,
}

#[derive(Clone, Debug)]
pub struct Timers<T> {
    now: f64,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T: Copy> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed on this arena's clock.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `label` to fire `delay` seconds from the current instant.
    /// Negative delays fire at the current instant.
    pub fn after(&mut self, delay: f64, label: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay.max(0.0),
            label,
        });
        id
    }

    /// Returns `true` if the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending task; returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Seconds until `id` fires, if it is still pending.
    pub fn remaining(&self, id: TaskId) -> Option<f64> {
        self.pending
            .iter()
            .find(|p| p.id == id)
            .map(|p| (p.due - self.now).max(0.0))
    }

    /// Pop the earliest task due at or before `horizon` and move the clock
    /// to its due time.  Ties fire in scheduling order.
    pub fn poll_until(&mut self, horizon: f64) -> Option<Fired<T>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= horizon)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;

        let task = self.pending.swap_remove(index);
        self.now = self.now.max(task.due);
        Some(Fired {
            id: task.id,
            due: task.due,
            label: task.label,
        })
    }

    /// Move the clock to `horizon` once every due task has been drained.
    pub fn settle(&mut self, horizon: f64) {
        self.now = self.now.max(horizon);
    }

    /// Advance by `dt` seconds and return every task that fired, in order.
    /// Suitable for one-shot timers that never re-arm.
    pub fn advance(&mut self, dt: f64) -> Vec<Fired<T>> {
        let horizon = self.now + dt.max(0.0);
        let mut fired = Vec::new();
        while let Some(task) = self.poll_until(horizon) {
            fired.push(task);
        }
        self.settle(horizon);
        fired
    }
}
