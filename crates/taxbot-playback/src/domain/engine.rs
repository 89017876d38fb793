//! The playback engine: turns a send into a timed reply cycle.
//!
//! A cycle is `send` → reply delay → placeholder → one word per tick →
//! completion, with the reply's mood committed part-way through the reveal.
//! The engine owns its scheduler but never blocks on it: whoever drives the
//! scheduler calls [`PlaybackEngine::on_timer`] with each fired handle.
//!
//! `script_index` moves at send time, `current_stage` only when a reveal
//! completes, so the resting theme always reflects the last *finished* reply.

use std::time::Duration;

use taxbot_core::event::EventMetadata;
use taxbot_core::scheduler::{Scheduler, TimerHandle};
use taxbot_script::domain::script::{ScriptStep, is_text_space, trim_text};
use tracing::{debug, trace};
use uuid::Uuid;

use super::events::{
    ConversationReset, MoodCommitted, PlaceholderAppended, PlaybackEvent, PlaybackEventKind,
    ReplyCompleted, ReplyScheduled, UserMessageAppended, WordRevealed,
};
use super::state::{PendingReply, Phase, PhaseKind, Theme};
use super::timing::PlaybackTiming;
use super::transcript::{Message, Transcript};

/// Reply used once the usable script is exhausted.
pub const FALLBACK_REPLY: &str =
    "The scripted flow is complete. Add more script steps to continue.";

/// Splits reply text into the words revealed one per tick.
#[must_use]
pub fn split_words(text: &str) -> Vec<String> {
    text.split(is_text_space)
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Scripted-reply playback state plus the transcript it produces.
#[derive(Debug)]
pub struct PlaybackEngine {
    scheduler: Box<dyn Scheduler>,
    timing: PlaybackTiming,
    phase: Phase,
    script_index: usize,
    current_stage: usize,
    typing_theme: Option<bool>,
    theme_transition: Duration,
    transcript: Transcript,
    disposed: bool,
    last_sequence: u64,
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Creates an idle engine whose transcript holds only `greeting`.
    #[must_use]
    pub fn new(scheduler: Box<dyn Scheduler>, timing: PlaybackTiming, greeting: &str) -> Self {
        Self {
            scheduler,
            timing,
            phase: Phase::Idle,
            script_index: 0,
            current_stage: 0,
            typing_theme: None,
            theme_transition: timing.min_theme_transition,
            transcript: Transcript::with_greeting(greeting),
            disposed: false,
            last_sequence: 0,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// A reply is in flight; sends are rejected.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Index of the next unconsumed usable step.
    #[must_use]
    pub fn script_index(&self) -> usize {
        self.script_index
    }

    /// Number of replies fully revealed.
    #[must_use]
    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    /// Mood override of the reply in flight, once committed.
    #[must_use]
    pub fn typing_theme(&self) -> Option<bool> {
        self.typing_theme
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Sequence number of the most recent event, `0` before any.
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Theme of the last completed stage: the initial step's mood at stage
    /// zero, otherwise the mood of that usable step (nice if it is gone).
    #[must_use]
    pub fn resting_theme(&self, initial_evil: bool, usable: &[ScriptStep]) -> bool {
        match self.current_stage {
            0 => initial_evil,
            stage => usable.get(stage - 1).is_some_and(|step| step.evil),
        }
    }

    /// The theme to paint: the committed override if any, else the resting
    /// theme.
    #[must_use]
    pub fn theme(&self, initial_evil: bool, usable: &[ScriptStep]) -> Theme {
        Theme {
            evil: self
                .typing_theme
                .unwrap_or_else(|| self.resting_theme(initial_evil, usable)),
            overridden: self.typing_theme.is_some(),
            transition_ms: as_millis(self.theme_transition),
        }
    }

    /// Starts a reply cycle for `text`.
    ///
    /// Returns `false`, changing nothing, when the text is blank, a reply is
    /// already in flight, or the engine has been disposed.
    pub fn send(&mut self, text: &str, usable: &[ScriptStep], correlation_id: Uuid) -> bool {
        if self.disposed || self.is_typing() {
            debug!(phase = ?self.phase.kind(), "send rejected while busy");
            return false;
        }
        let content = trim_text(text);
        if content.is_empty() {
            return false;
        }

        self.cancel_pending_timers();
        self.transcript.push(Message::user(content));
        self.record(
            correlation_id,
            PlaybackEventKind::UserMessageAppended(UserMessageAppended {
                content: content.to_owned(),
            }),
        );

        let (text, evil, fallback) = match usable.get(self.script_index) {
            Some(step) => {
                self.script_index += 1;
                (step.text.clone(), step.evil, false)
            }
            None => (FALLBACK_REPLY.to_owned(), false, true),
        };

        let timer = self.scheduler.run_after(self.timing.reply_delay);
        self.record(
            correlation_id,
            PlaybackEventKind::ReplyScheduled(ReplyScheduled {
                script_index: self.script_index,
                fallback,
                evil,
            }),
        );
        self.phase = Phase::AwaitingReply {
            reply: PendingReply {
                text,
                evil,
                correlation_id,
            },
            timer,
        };
        true
    }

    /// Delivers a fired timer. Returns `false` for handles the current phase
    /// is not waiting on (cancelled, stale, or after dispose).
    pub fn on_timer(&mut self, handle: TimerHandle, usable_len: usize) -> bool {
        if self.disposed {
            trace!(%handle, "timer fired after dispose");
            return false;
        }

        match std::mem::take(&mut self.phase) {
            Phase::AwaitingReply { reply, timer } if timer == handle => {
                self.begin_reveal(reply, usable_len);
            }
            Phase::Typing {
                reply,
                words,
                mut revealed,
                tick,
                mood_commit,
            } if tick == handle => {
                revealed += 1;
                let content = words[..revealed].join(" ");
                self.transcript.set_last_assistant(content.as_str());
                self.record(
                    reply.correlation_id,
                    PlaybackEventKind::WordRevealed(WordRevealed { revealed, content }),
                );

                if revealed < words.len() {
                    self.phase = Phase::Typing {
                        reply,
                        words,
                        revealed,
                        tick,
                        mood_commit,
                    };
                } else {
                    self.scheduler.cancel(tick);
                    if let Some(mood) = mood_commit {
                        trace!(%mood, "reveal finished before mood commit");
                        self.scheduler.cancel(mood);
                    }
                    self.complete_reply(&reply, usable_len);
                }
            }
            Phase::Typing {
                reply,
                words,
                revealed,
                tick,
                mood_commit: Some(mood),
            } if mood == handle => {
                self.typing_theme = Some(reply.evil);
                self.record(
                    reply.correlation_id,
                    PlaybackEventKind::MoodCommitted(MoodCommitted { evil: reply.evil }),
                );
                self.phase = Phase::Typing {
                    reply,
                    words,
                    revealed,
                    tick,
                    mood_commit: None,
                };
            }
            phase => {
                self.phase = phase;
                trace!(%handle, "ignoring stale timer");
                return false;
            }
        }
        true
    }

    /// Cancels any reply in flight and starts over from `greeting`.
    pub fn reset(&mut self, greeting: &str, correlation_id: Uuid) {
        self.cancel_pending_timers();
        self.phase = Phase::Idle;
        self.transcript = Transcript::with_greeting(greeting);
        self.script_index = 0;
        self.current_stage = 0;
        self.typing_theme = None;
        self.theme_transition = self.timing.min_theme_transition;
        self.record(
            correlation_id,
            PlaybackEventKind::ConversationReset(ConversationReset {
                greeting: greeting.to_owned(),
            }),
        );
    }

    /// Cancels every pending timer and turns later sends and timer
    /// deliveries into no-ops.
    pub fn dispose(&mut self) {
        self.cancel_pending_timers();
        self.phase = Phase::Idle;
        self.typing_theme = None;
        self.disposed = true;
    }

    /// Keeps `script_index` within `[0, usable_len]` after steps are removed.
    pub fn clamp_script_index(&mut self, usable_len: usize) {
        self.script_index = self.script_index.min(usable_len);
    }

    /// Replaces the greeting while nothing else has happened yet. Returns
    /// whether the transcript changed.
    pub fn sync_greeting(&mut self, greeting: &str) -> bool {
        if self.is_typing() || self.script_index != 0 || !self.transcript.is_pristine() {
            return false;
        }
        self.transcript.set_last_assistant(greeting)
    }

    /// Takes the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn begin_reveal(&mut self, reply: PendingReply, usable_len: usize) {
        let words = split_words(&reply.text);
        self.theme_transition = self.timing.theme_transition(words.len());
        self.transcript.push(Message::assistant(""));
        self.record(
            reply.correlation_id,
            PlaybackEventKind::PlaceholderAppended(PlaceholderAppended {
                word_count: words.len(),
                theme_transition_ms: as_millis(self.theme_transition),
            }),
        );

        if words.is_empty() {
            self.transcript.set_last_assistant(reply.text.as_str());
            self.complete_reply(&reply, usable_len);
            return;
        }

        let typing = self.timing.typing_duration(words.len());
        let mood_delay = PlaybackTiming::mood_commit_delay(typing);
        let reveal = self.timing.reveal_duration(words.len());
        // A commit due at or after the last word would be cleared on arrival.
        let mood_commit = (mood_delay < reveal).then(|| self.scheduler.run_after(mood_delay));
        let tick = self.scheduler.run_every(self.timing.word_interval);
        self.phase = Phase::Typing {
            reply,
            words,
            revealed: 0,
            tick,
            mood_commit,
        };
    }

    fn complete_reply(&mut self, reply: &PendingReply, usable_len: usize) {
        self.current_stage = (self.current_stage + 1).min(usable_len);
        self.typing_theme = None;
        self.phase = Phase::Idle;
        self.record(
            reply.correlation_id,
            PlaybackEventKind::ReplyCompleted(ReplyCompleted {
                stage: self.current_stage,
            }),
        );
    }

    fn cancel_pending_timers(&mut self) {
        for handle in self.phase.timers() {
            self.scheduler.cancel(handle);
        }
    }

    fn record(&mut self, correlation_id: Uuid, kind: PlaybackEventKind) {
        self.last_sequence += 1;
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_type: kind.name().to_owned(),
                sequence_number: self.last_sequence,
                correlation_id,
                occurred_at: self.scheduler.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}
