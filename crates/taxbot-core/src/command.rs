//! Command envelope shared by the chat and script contexts.

use uuid::Uuid;

/// Implemented by every request the View can make of the conversation.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name used in log fields, e.g. `chat.send_message`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID carried onto every event the command causes, including
    /// events raised later by timers of the same reply cycle.
    fn correlation_id(&self) -> Uuid;
}
