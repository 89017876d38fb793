//! Test scheduler — a virtual clock implementing `Scheduler`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taxbot_core::scheduler::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: Duration,
    interval: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, Entry>,
}

/// A scheduler whose clock only moves when a test calls
/// [`ManualScheduler::advance`].
///
/// Clones share the same clock and timers, so a test can hand one clone to
/// the engine and keep another to drive time.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<Inner>>,
}

impl ManualScheduler {
    /// Creates a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers still pending.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().timers.len()
    }

    /// Whether `handle` is still pending.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.inner.lock().unwrap().timers.contains_key(&handle.raw())
    }

    /// Moves the clock forward by `by`, calling `fire` for every timer that
    /// comes due, in due-time order (ties in scheduling order). Timers
    /// scheduled by `fire` itself are honored if they fall inside the window.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn advance(&self, by: Duration, mut fire: impl FnMut(TimerHandle)) {
        let target = self.inner.lock().unwrap().now + by;
        // The lock is released before `fire`, which usually schedules more.
        while let Some(handle) = self.pop_due(target) {
            fire(handle);
        }
        let mut inner = self.inner.lock().unwrap();
        inner.now = inner.now.max(target);
    }

    fn pop_due(&self, target: Duration) -> Option<TimerHandle> {
        let mut inner = self.inner.lock().unwrap();
        let (id, entry) = inner
            .timers
            .iter()
            .filter(|(_, entry)| entry.due <= target)
            .min_by_key(|(id, entry)| (entry.due, **id))
            .map(|(id, entry)| (*id, *entry))?;

        inner.now = entry.due;
        match entry.interval {
            Some(interval) => {
                if let Some(timer) = inner.timers.get_mut(&id) {
                    timer.due = entry.due + interval;
                }
            }
            None => {
                inner.timers.remove(&id);
            }
        }
        Some(TimerHandle::new(id))
    }

    fn insert(&self, delay: Duration, interval: Option<Duration>) -> TimerHandle {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let due = inner.now + delay;
        inner.timers.insert(id, Entry { due, interval });
        TimerHandle::new(id)
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.inner.lock().unwrap().now
    }

    fn run_after(&mut self, delay: Duration) -> TimerHandle {
        self.insert(delay, None)
    }

    fn run_every(&mut self, interval: Duration) -> TimerHandle {
        assert!(!interval.is_zero(), "repeating timer needs a non-zero interval");
        self.insert(interval, Some(interval))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner.lock().unwrap().timers.remove(&handle.raw());
    }
}
