//! Command handlers for the playback context.
//!
//! Each handler locks the shared conversation only for the synchronous
//! domain call, drains the events it produced, logs them, and returns them.
//! The lock is never held across an await point.

use std::sync::{Mutex, MutexGuard};

use taxbot_core::command::Command;
use taxbot_core::error::DomainError;
use taxbot_core::event::DomainEvent;
use taxbot_core::scheduler::TimerHandle;
use taxbot_script::application::command_handlers::EditOutcome;
use taxbot_script::domain::codec::ScriptDocument;
use taxbot_script::domain::commands::{EditScript, ImportScript};
use tracing::{debug, info, warn};

use super::conversation::Conversation;
use crate::domain::commands::{ResetConversation, SendMessage};
use crate::domain::events::PlaybackEvent;

/// Result of a handled playback command.
#[derive(Debug)]
pub struct PlaybackCommandResult {
    /// `false` when the command was a no-op (blank text, reply in flight).
    pub accepted: bool,
    /// Events produced by the command.
    pub events: Vec<PlaybackEvent>,
}

fn lock(conversation: &Mutex<Conversation>) -> Result<MutexGuard<'_, Conversation>, DomainError> {
    conversation
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("conversation mutex poisoned: {e}")))
}

fn log_events(events: &[PlaybackEvent]) {
    for event in events {
        debug!(
            event_type = event.event_type(),
            sequence_number = event.metadata().sequence_number,
            correlation_id = %event.metadata().correlation_id,
            payload = %event.to_payload(),
            "playback event"
        );
    }
}

fn drain_and_log(conversation: &mut Conversation) -> Vec<PlaybackEvent> {
    let events = conversation.drain_events();
    log_events(&events);
    events
}

/// Handles the `SendMessage` command: appends the user message and arms the
/// reply timer, unless the send is rejected.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_send_message(
    conversation: &Mutex<Conversation>,
    command: &SendMessage,
) -> Result<PlaybackCommandResult, DomainError> {
    let mut guard = lock(conversation)?;
    let accepted = guard.send(&command.text, command.correlation_id());
    if !accepted {
        info!(correlation_id = %command.correlation_id(), "send rejected");
    }
    Ok(PlaybackCommandResult {
        accepted,
        events: drain_and_log(&mut guard),
    })
}

/// Handles the `ResetConversation` command.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_reset_conversation(
    conversation: &Mutex<Conversation>,
    command: &ResetConversation,
) -> Result<PlaybackCommandResult, DomainError> {
    let mut guard = lock(conversation)?;
    guard.reset(command.correlation_id());
    Ok(PlaybackCommandResult {
        accepted: true,
        events: drain_and_log(&mut guard),
    })
}

/// Delivers a fired timer to the conversation. Stale handles are accepted
/// and ignored.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_timer_fired(
    conversation: &Mutex<Conversation>,
    handle: TimerHandle,
) -> Result<PlaybackCommandResult, DomainError> {
    let mut guard = lock(conversation)?;
    let accepted = guard.fire_timer(handle);
    Ok(PlaybackCommandResult {
        accepted,
        events: drain_and_log(&mut guard),
    })
}

/// Handles the `EditScript` command.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_edit_script(
    conversation: &Mutex<Conversation>,
    command: &EditScript,
) -> Result<EditOutcome, DomainError> {
    let mut guard = lock(conversation)?;
    let outcome = guard.edit(&command.edit);
    info!(
        correlation_id = %command.correlation_id(),
        edit = command.edit.name(),
        applied = outcome.applied,
        "script edited"
    );
    Ok(outcome)
}

/// Handles the `ImportScript` command: replaces the script and resets
/// playback, or leaves everything untouched on failure.
///
/// # Errors
///
/// Returns `DomainError::Import` if the document is rejected and
/// `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_import_script(
    conversation: &Mutex<Conversation>,
    command: &ImportScript,
) -> Result<PlaybackCommandResult, DomainError> {
    let mut guard = lock(conversation)?;
    match guard.import(&command.document, command.correlation_id()) {
        Ok(count) => {
            info!(correlation_id = %command.correlation_id(), count, "script imported");
            Ok(PlaybackCommandResult {
                accepted: true,
                events: drain_and_log(&mut guard),
            })
        }
        Err(err) => {
            warn!(
                correlation_id = %command.correlation_id(),
                error = %err,
                "script import rejected"
            );
            Err(err.into())
        }
    }
}

/// Captures the current script as an export document.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_export_script(
    conversation: &Mutex<Conversation>,
) -> Result<ScriptDocument, DomainError> {
    let mut guard = lock(conversation)?;
    Ok(guard.export())
}

/// Tears the conversation down; later timer deliveries are no-ops.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the conversation lock is poisoned.
pub fn handle_dispose(conversation: &Mutex<Conversation>) -> Result<(), DomainError> {
    lock(conversation)?.dispose();
    info!("conversation disposed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use taxbot_core::error::ImportError;
    use taxbot_script::domain::commands::ScriptEdit;
    use taxbot_test_support::{ManualScheduler, single_step_script};
    use uuid::Uuid;

    use super::*;
    use crate::domain::timing::PlaybackTiming;

    fn shared() -> (Mutex<Conversation>, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let conversation = Conversation::new(
            single_step_script(),
            Box::new(scheduler.clone()),
            PlaybackTiming::default(),
        );
        (Mutex::new(conversation), scheduler)
    }

    #[test]
    fn test_handle_send_message_returns_user_and_schedule_events() {
        // Arrange
        let (conversation, _scheduler) = shared();
        let command = SendMessage {
            correlation_id: Uuid::new_v4(),
            text: "hello".to_owned(),
        };

        // Act
        let result = handle_send_message(&conversation, &command).unwrap();

        // Assert
        assert!(result.accepted);
        let types: Vec<_> = result.events.iter().map(DomainEvent::event_type).collect();
        assert_eq!(types, vec!["chat.user_message_appended", "chat.reply_scheduled"]);
        assert!(
            result
                .events
                .iter()
                .all(|e| e.metadata().correlation_id == command.correlation_id)
        );
    }

    #[test]
    fn test_handle_send_message_blank_text_is_not_accepted() {
        let (conversation, _scheduler) = shared();
        let command = SendMessage {
            correlation_id: Uuid::new_v4(),
            text: "  ".to_owned(),
        };

        let result = handle_send_message(&conversation, &command).unwrap();

        assert!(!result.accepted);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_handle_timer_fired_drives_a_full_cycle() {
        // Arrange
        let (conversation, scheduler) = shared();
        let command = SendMessage {
            correlation_id: Uuid::new_v4(),
            text: "hello".to_owned(),
        };
        handle_send_message(&conversation, &command).unwrap();

        // Act
        scheduler.advance(Duration::from_secs(5), |handle| {
            handle_timer_fired(&conversation, handle).unwrap();
        });

        // Assert
        let guard = conversation.lock().unwrap();
        assert_eq!(guard.engine().current_stage(), 1);
        assert!(!guard.engine().is_typing());
    }

    #[test]
    fn test_handle_import_script_maps_rejection_to_import_error() {
        let (conversation, _scheduler) = shared();
        let command = ImportScript {
            correlation_id: Uuid::new_v4(),
            document: r#"{"steps": [1, 2]}"#.to_owned(),
        };

        let result = handle_import_script(&conversation, &command);

        match result {
            Err(DomainError::Import(ImportError::NoValidSteps)) => {}
            other => panic!("expected NoValidSteps, got {other:?}"),
        }
    }

    #[test]
    fn test_handle_import_script_emits_reset_event() {
        let (conversation, _scheduler) = shared();
        let command = ImportScript {
            correlation_id: Uuid::new_v4(),
            document: r#"["a", "b"]"#.to_owned(),
        };

        let result = handle_import_script(&conversation, &command).unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].event_type(), "chat.conversation_reset");
    }

    #[test]
    fn test_handle_edit_script_reports_out_of_range() {
        let (conversation, _scheduler) = shared();
        let command = EditScript {
            correlation_id: Uuid::new_v4(),
            edit: ScriptEdit::RemoveStep(3),
        };

        let outcome = handle_edit_script(&conversation, &command).unwrap();

        assert!(!outcome.applied);
    }

    #[test]
    fn test_handle_dispose_turns_timers_into_no_ops() {
        let (conversation, scheduler) = shared();
        let command = SendMessage {
            correlation_id: Uuid::new_v4(),
            text: "hello".to_owned(),
        };
        handle_send_message(&conversation, &command).unwrap();

        handle_dispose(&conversation).unwrap();
        let result = handle_timer_fired(&conversation, taxbot_core::scheduler::TimerHandle::new(0))
            .unwrap();

        assert!(!result.accepted);
        assert_eq!(scheduler.pending(), 0);
    }
}
