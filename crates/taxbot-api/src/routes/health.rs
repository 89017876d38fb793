//! Liveness of the API and the conversation it serves.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Name reported in health responses.
pub const SERVICE_NAME: &str = "taxbot-api";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Reporting service.
    pub service: &'static str,
    /// `ok`, or `degraded` when the conversation cannot be reached.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether a reply is being played back, when known.
    pub is_typing: Option<bool>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, is_typing) = match state.conversation.lock() {
        Ok(conversation) => (StatusCode::OK, "ok", Some(conversation.engine().is_typing())),
        Err(err) => {
            warn!(error = %err, "conversation unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", None)
        }
    };

    let body = HealthResponse {
        service: SERVICE_NAME,
        status,
        version: env!("CARGO_PKG_VERSION"),
        is_typing,
    };
    (code, Json(body))
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
