//! Commands for the playback context.

use taxbot_core::command::Command;
use uuid::Uuid;

/// Command to send a user message and start a reply cycle.
#[derive(Debug, Clone)]
pub struct SendMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw input; blank input is rejected.
    pub text: String,
}

impl Command for SendMessage {
    fn command_type(&self) -> &'static str {
        "chat.send_message"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to cancel any reply in flight and start over from the greeting.
#[derive(Debug, Clone)]
pub struct ResetConversation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ResetConversation {
    fn command_type(&self) -> &'static str {
        "chat.reset_conversation"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
