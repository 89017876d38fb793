//! Routes for the chat window: the transcript view, sending and resetting.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use taxbot_core::event::DomainEvent;
use tracing::{info, instrument};
use uuid::Uuid;

use taxbot_playback::application::command_handlers::{self, PlaybackCommandResult};
use taxbot_playback::application::query_handlers::{self, ConversationView};
use taxbot_playback::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /send.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Text typed by the user.
    pub text: String,
}

/// Response body returned after a chat command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// `false` when the command changed nothing (blank text, reply in flight).
    pub accepted: bool,
    /// Types of the playback events the command produced.
    pub events: Vec<&'static str>,
}

impl From<PlaybackCommandResult> for CommandResponse {
    fn from(result: PlaybackCommandResult) -> Self {
        Self {
            accepted: result.accepted,
            events: result.events.iter().map(DomainEvent::event_type).collect(),
        }
    }
}

/// GET /
#[instrument(skip(state))]
async fn get_conversation(
    State(state): State<AppState>,
) -> Result<Json<ConversationView>, ApiError> {
    let view = query_handlers::get_conversation_view(&state.conversation)?;
    Ok(Json(view))
}

/// POST /send
#[instrument(skip(state, request))]
async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::SendMessage {
        correlation_id: Uuid::new_v4(),
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling send_message command");

    let result = command_handlers::handle_send_message(&state.conversation, &command)?;

    Ok(Json(result.into()))
}

/// POST /reset
#[instrument(skip(state))]
async fn reset_conversation(
    State(state): State<AppState>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ResetConversation {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling reset_conversation command");

    let result = command_handlers::handle_reset_conversation(&state.conversation, &command)?;

    Ok(Json(result.into()))
}

/// Returns the router for the chat window.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_conversation))
        .route("/send", post(send_message))
        .route("/reset", post(reset_conversation))
}
