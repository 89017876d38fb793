//! Tokio-backed [`Scheduler`].
//!
//! Every timer is a spawned task that sleeps and then sends its handle down
//! an unbounded channel. Cancelling a timer aborts its task. A handle may
//! still arrive after `cancel` if it was sent first; the conversation ignores
//! handles it no longer owns.

use std::collections::HashMap;
use std::time::Duration;

use taxbot_core::scheduler::{Scheduler, TimerHandle};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

/// Floor applied to repeating intervals; Tokio rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Scheduler whose timers run on a Tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    runtime: Handle,
    started: Instant,
    next_id: u64,
    fired: UnboundedSender<TimerHandle>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Creates a scheduler spawning onto `runtime`, plus the receiver that
    /// yields each fired handle.
    #[must_use]
    pub fn channel(runtime: Handle) -> (Self, UnboundedReceiver<TimerHandle>) {
        let (fired, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            started: Instant::now(),
            next_id: 0,
            fired,
            tasks: HashMap::new(),
        };
        (scheduler, receiver)
    }

    /// Number of timer tasks that have not finished or been cancelled.
    #[must_use]
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn allocate(&mut self) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());
        let handle = TimerHandle::new(self.next_id);
        self.next_id += 1;
        handle
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn run_after(&mut self, delay: Duration) -> TimerHandle {
        let handle = self.allocate();
        let fired = self.fired.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone only during shutdown.
            let _ = fired.send(handle);
        });
        self.tasks.insert(handle, task);
        trace!(%handle, ?delay, "run_after scheduled");
        handle
    }

    fn run_every(&mut self, interval: Duration) -> TimerHandle {
        let handle = self.allocate();
        let fired = self.fired.clone();
        let period = interval.max(MIN_INTERVAL);
        let task = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if fired.send(handle).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        trace!(%handle, ?period, "run_every scheduled");
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            trace!(%handle, "timer cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
