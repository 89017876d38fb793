//! Domain event abstractions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Type name, e.g. `chat.word_revealed`.
    pub event_type: String,
    /// Monotonically increasing position within the conversation's event log.
    pub sequence_number: u64,
    /// Correlation ID of the command that started the causing cycle.
    pub correlation_id: Uuid,
    /// Scheduler time at which the event was recorded.
    pub occurred_at: Duration,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
