//! Playback state machine.

use serde::Serialize;
use taxbot_core::scheduler::TimerHandle;
use uuid::Uuid;

/// A reply chosen at send time, waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    /// Text to reveal.
    pub text: String,
    /// Mood committed part-way through the reveal.
    pub evil: bool,
    /// Correlation ID of the send that triggered this reply.
    pub correlation_id: Uuid,
}

/// Where the engine is within a reply cycle. Each in-flight variant owns the
/// timers it is waiting on, so no timer outlives its phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Waiting for user input. No timers pending.
    #[default]
    Idle,
    /// Reply chosen; the reply-delay timer has not fired yet.
    AwaitingReply {
        reply: PendingReply,
        timer: TimerHandle,
    },
    /// Placeholder shown; words are being revealed on every tick.
    Typing {
        reply: PendingReply,
        words: Vec<String>,
        revealed: usize,
        tick: TimerHandle,
        /// `None` once the mood has been committed.
        mood_commit: Option<TimerHandle>,
    },
}

impl Phase {
    pub(crate) fn kind(&self) -> PhaseKind {
        match self {
            Self::Idle => PhaseKind::Idle,
            Self::AwaitingReply { .. } => PhaseKind::AwaitingReply,
            Self::Typing { .. } => PhaseKind::Typing,
        }
    }

    /// Every timer the phase is waiting on.
    pub(crate) fn timers(&self) -> Vec<TimerHandle> {
        match self {
            Self::Idle => Vec::new(),
            Self::AwaitingReply { timer, .. } => vec![*timer],
            Self::Typing {
                tick, mood_commit, ..
            } => std::iter::once(*tick).chain(*mood_commit).collect(),
        }
    }
}

/// Payload-free view of [`Phase`] for readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Idle,
    AwaitingReply,
    Typing,
}

/// The theme the View should paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Evil (`true`) or nice.
    pub evil: bool,
    /// `true` while an in-flight reply's mood overrides the resting theme.
    pub overridden: bool,
    /// Cross-fade duration for the current transition, in milliseconds.
    pub transition_ms: u64,
}
