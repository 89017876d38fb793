//! Scheduler abstraction for deferred and repeating work.
//!
//! The playback engine never sleeps. It asks a [`Scheduler`] for timers and
//! receives opaque [`TimerHandle`]s back; whoever drives the scheduler feeds
//! fired handles into the engine. In production that is a Tokio task, in
//! tests a virtual clock advanced by hand.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque handle to a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a raw identifier. Identifiers are allocated by the scheduler.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Accepts "run after" and "run every" requests.
///
/// Implementations must hand out distinct handles and must treat `cancel` of
/// an unknown or already-fired handle as a no-op. A repeating timer keeps
/// firing until cancelled.
pub trait Scheduler: Send + fmt::Debug {
    /// Time elapsed since the scheduler was created.
    fn now(&self) -> Duration;

    /// Schedules a one-shot timer that fires after `delay`.
    fn run_after(&mut self, delay: Duration) -> TimerHandle;

    /// Schedules a repeating timer; the first firing is one `interval` away.
    fn run_every(&mut self, interval: Duration) -> TimerHandle;

    /// Cancels a pending timer.
    fn cancel(&mut self, handle: TimerHandle);
}
