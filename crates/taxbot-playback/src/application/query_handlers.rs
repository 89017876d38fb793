//! Query handlers for the playback context.
//!
//! Builds the read-only view the chat window binds to.

use std::sync::Mutex;

use serde::Serialize;
use taxbot_core::error::DomainError;
use taxbot_script::application::query_handlers::{ScriptView, get_script_view};

use super::conversation::Conversation;
use crate::domain::state::{PhaseKind, Theme};
use crate::domain::transcript::Message;

/// Read-only view of the chat window.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    /// Transcript in display order.
    pub messages: Vec<Message>,
    /// `true` from an accepted send until the reply is fully revealed.
    pub is_typing: bool,
    /// Current phase of the reply cycle.
    pub phase: PhaseKind,
    /// Position of the next usable step to play.
    pub script_index: usize,
    /// Number of fully completed replies.
    pub current_stage: usize,
    /// Number of steps playback can still draw from.
    pub usable_count: usize,
    /// Theme to paint.
    pub theme: Theme,
    /// Tagline shown in the header.
    pub tagline: String,
    /// Last import/export status message.
    pub status: Option<String>,
    /// Sequence number of the most recent playback event.
    pub last_event_sequence: u64,
}

fn lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::Infrastructure(format!("conversation mutex poisoned: {e}"))
}

/// Builds the chat view of `conversation`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn get_conversation_view(
    conversation: &Mutex<Conversation>,
) -> Result<ConversationView, DomainError> {
    let guard = conversation.lock().map_err(lock_error)?;
    let engine = guard.engine();
    Ok(ConversationView {
        messages: engine.transcript().messages().to_vec(),
        is_typing: engine.is_typing(),
        phase: engine.phase(),
        script_index: engine.script_index(),
        current_stage: engine.current_stage(),
        usable_count: guard.script().usable_len(),
        theme: guard.theme(),
        tagline: guard.script().display_tagline().to_owned(),
        status: guard.status().map(str::to_owned),
        last_event_sequence: engine.last_sequence(),
    })
}

/// Builds the script editor view of `conversation`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn get_script(conversation: &Mutex<Conversation>) -> Result<ScriptView, DomainError> {
    let guard = conversation.lock().map_err(lock_error)?;
    Ok(get_script_view(guard.script()))
}
