//! Cancellable scheduled callbacks
//!
//! A single-threaded timer queue polled from the UI loop. Each scheduled
//! effect gets a [`TaskHandle`] that can cancel it; dropping the queue
//! cancels everything still pending, so a torn-down screen never receives a
//! late effect.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Handle to one scheduled effect
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct Scheduled<E> {
    id: u64,
    deadline: Instant,
    cancelled: Rc<Cell<bool>>,
    effect: E,
}

pub struct Timers<E> {
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, effect: E) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;

        let cancelled = Rc::new(Cell::new(false));
        self.pending.push(Scheduled {
            id,
            deadline: now + delay,
            cancelled: cancelled.clone(),
            effect,
        });
        TaskHandle { id, cancelled }
    }

    /// Cancel every pending effect
    pub fn cancel_all(&mut self) {
        for task in self.pending.drain(..) {
            task.cancelled.set(true);
        }
    }

    /// Cancel the pending effects matching `pred`
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|task| {
            let drop_it = pred(&task.effect);
            if drop_it {
                task.cancelled.set(true);
            }
            !drop_it
        });
        before - self.pending.len()
    }

    pub fn is_pending(&self, handle: &TaskHandle) -> bool {
        !handle.is_cancelled() && self.pending.iter().any(|task| task.id == handle.id)
    }

    /// Number of live (not cancelled) effects
    fn len(&self) -> usize {
        self.pending.iter().filter(|task| !task.cancelled.get()).count()
    }

    /// Earliest deadline among live effects
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .iter()
            .filter(|task| !task.cancelled.get())
            .map(|task| task.deadline)
            .min()
    }

    /// Remove and return every due effect in deadline order; cancelled ones are discarded
    pub fn poll(&mut self, now: Instant) -> Vec<E> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            let task = &self.pending[i];
            if task.cancelled.get() {
                self.pending.swap_remove(i);
            } else if task.deadline <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|task| (task.deadline, task.id));
        due.into_iter().map(|task| task.effect).collect()
    }
}

impl<E> Drop for Timers<E> {
    fn drop(&mut self) {
        let live = self.len();
        if live > 0 {
            debug!(cancelled = live, "Dropping timer queue with pending effects");
        }
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_poll_returns_due_effects_in_order() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, ms(300), "late");
        timers.schedule(start, ms(100), "early");
        timers.schedule(start, ms(900), "future");

        assert!(timers.poll(start + ms(50)).is_empty());
        assert_eq!(timers.poll(start + ms(500)), vec!["early", "late"]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(start + ms(900)));
    }

    #[test]
    fn test_cancelled_handle_never_fires() {
        let start = Instant::now();
        let mut timers = Timers::new();
        let handle = timers.schedule(start, ms(100), 1);
        timers.schedule(start, ms(100), 2);

        handle.cancel();
        assert!(!timers.is_pending(&handle));
        assert_eq!(timers.poll(start + ms(200)), vec![2]);
    }

    #[test]
    fn test_cancel_all_marks_handles() {
        let start = Instant::now();
        let mut timers = Timers::new();
        let a = timers.schedule(start, ms(10), ());
        let b = timers.schedule(start, ms(20), ());

        timers.cancel_all();
        assert!(a.is_cancelled() && b.is_cancelled());
        assert!(timers.poll(start + ms(100)).is_empty());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_drop_cancels_outstanding_handles() {
        let start = Instant::now();
        let handle = {
            let mut timers = Timers::new();
            timers.schedule(start, ms(10), "never")
        };
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_cancel_where_filters_by_effect() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, ms(10), "network");
        timers.schedule(start, ms(10), "toast");
        timers.schedule(start, ms(10), "network");

        assert_eq!(timers.cancel_where(|e| *e == "network"), 2);
        assert_eq!(timers.poll(start + ms(10)), vec!["toast"]);
    }
}
