//! Domain events for the playback context.

use serde::{Deserialize, Serialize};
use taxbot_core::event::{DomainEvent, EventMetadata};

/// A user message was added to the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessageAppended {
    /// Trimmed message text.
    pub content: String,
}

/// A reply was chosen and its delay timer armed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyScheduled {
    /// Script index after the send.
    pub script_index: usize,
    /// `true` when the script was exhausted and the fallback text is used.
    pub fallback: bool,
    /// Mood of the chosen reply.
    pub evil: bool,
}

/// The empty assistant message the reveal writes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderAppended {
    /// Words the reveal will take.
    pub word_count: usize,
    /// Theme cross-fade duration for this reply, in milliseconds.
    pub theme_transition_ms: u64,
}

/// One more word is visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRevealed {
    /// Number of words now visible.
    pub revealed: usize,
    /// Visible content after this word.
    pub content: String,
}

/// The in-flight reply's mood now overrides the resting theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCommitted {
    pub evil: bool,
}

/// A reply finished revealing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyCompleted {
    /// Completed stage count after this reply.
    pub stage: usize,
}

/// The transcript was rebuilt from the greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationReset {
    /// Greeting now shown.
    pub greeting: String,
}

/// Event payload variants for the playback context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    UserMessageAppended(UserMessageAppended),
    ReplyScheduled(ReplyScheduled),
    PlaceholderAppended(PlaceholderAppended),
    WordRevealed(WordRevealed),
    MoodCommitted(MoodCommitted),
    ReplyCompleted(ReplyCompleted),
    ConversationReset(ConversationReset),
}

impl PlaybackEventKind {
    /// Event type name recorded in metadata.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserMessageAppended(_) => "chat.user_message_appended",
            Self::ReplyScheduled(_) => "chat.reply_scheduled",
            Self::PlaceholderAppended(_) => "chat.placeholder_appended",
            Self::WordRevealed(_) => "chat.word_revealed",
            Self::MoodCommitted(_) => "chat.mood_committed",
            Self::ReplyCompleted(_) => "chat.reply_completed",
            Self::ConversationReset(_) => "chat.conversation_reset",
        }
    }
}

/// Domain event envelope for the playback context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.name()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PlaybackEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
