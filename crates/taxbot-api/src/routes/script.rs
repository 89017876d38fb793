//! Routes for the script editor: edits, import and export.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use taxbot_playback::application::{command_handlers, query_handlers};
use taxbot_script::application::query_handlers::ScriptView;
use taxbot_script::domain::codec::SCRIPT_FILE_NAME;
use taxbot_script::domain::commands::{EditScript, ImportScript, ScriptEdit};
use taxbot_script::domain::script::ScriptStep;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for PUT /tagline and PUT /steps/{index}/text.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// The new text.
    pub text: String,
}

/// Request body for PUT /steps/{index}/evil.
#[derive(Debug, Deserialize)]
pub struct EvilRequest {
    /// The new mood.
    pub evil: bool,
}

/// Request body for PUT /initial-step.
#[derive(Debug, Deserialize)]
pub struct InitialStepRequest {
    /// Greeting text.
    pub text: String,
    /// Greeting mood.
    #[serde(default)]
    pub evil: bool,
}

/// Response body returned after an edit.
#[derive(Debug, Serialize)]
pub struct EditResponse {
    /// `false` when the edit targeted a step that does not exist.
    pub applied: bool,
    /// The script after the edit.
    pub script: ScriptView,
}

/// Response body returned after a successful import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Status line shown to the user.
    pub status: Option<String>,
    /// The imported script.
    pub script: ScriptView,
}

fn apply_edit(state: &AppState, edit: ScriptEdit) -> Result<Json<EditResponse>, ApiError> {
    let command = EditScript {
        correlation_id: Uuid::new_v4(),
        edit,
    };

    info!(
        correlation_id = %command.correlation_id,
        edit = command.edit.name(),
        "handling edit_script command"
    );

    let outcome = command_handlers::handle_edit_script(&state.conversation, &command)?;
    let script = query_handlers::get_script(&state.conversation)?;

    Ok(Json(EditResponse {
        applied: outcome.applied,
        script,
    }))
}

/// GET /
#[instrument(skip(state))]
async fn get_script(State(state): State<AppState>) -> Result<Json<ScriptView>, ApiError> {
    let view = query_handlers::get_script(&state.conversation)?;
    Ok(Json(view))
}

/// PUT /tagline
#[instrument(skip(state, request))]
async fn set_tagline(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    apply_edit(&state, ScriptEdit::SetTagline(request.text))
}

/// PUT /initial-step
#[instrument(skip(state, request))]
async fn set_initial_step(
    State(state): State<AppState>,
    Json(request): Json<InitialStepRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    let step = ScriptStep::new(request.text, request.evil);
    apply_edit(&state, ScriptEdit::SetInitialStep(step))
}

/// POST /steps
#[instrument(skip(state))]
async fn add_step(State(state): State<AppState>) -> Result<Json<EditResponse>, ApiError> {
    apply_edit(&state, ScriptEdit::AddStep)
}

/// PUT /steps/{index}/text
#[instrument(skip(state, request))]
async fn update_step_text(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<TextRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    let edit = ScriptEdit::UpdateStepText {
        index,
        text: request.text,
    };
    apply_edit(&state, edit)
}

/// PUT /steps/{index}/evil
#[instrument(skip(state, request))]
async fn update_step_evil(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<EvilRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    let edit = ScriptEdit::UpdateStepEvil {
        index,
        evil: request.evil,
    };
    apply_edit(&state, edit)
}

/// DELETE /steps/{index}
#[instrument(skip(state))]
async fn remove_step(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<EditResponse>, ApiError> {
    apply_edit(&state, ScriptEdit::RemoveStep(index))
}

/// GET /export
#[instrument(skip(state))]
async fn export_script(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let document = command_handlers::handle_export_script(&state.conversation)?;

    info!(steps = document.steps.len(), "script exported");

    let disposition = format!("attachment; filename=\"{SCRIPT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.to_json_pretty(),
    ))
}

/// POST /import
#[instrument(skip(state, document))]
async fn import_script(
    State(state): State<AppState>,
    document: String,
) -> Result<Json<ImportResponse>, ApiError> {
    let command = ImportScript {
        correlation_id: Uuid::new_v4(),
        document,
    };

    info!(
        correlation_id = %command.correlation_id,
        bytes = command.document.len(),
        "handling import_script command"
    );

    command_handlers::handle_import_script(&state.conversation, &command)?;
    let status = query_handlers::get_conversation_view(&state.conversation)?.status;
    let script = query_handlers::get_script(&state.conversation)?;

    Ok(Json(ImportResponse { status, script }))
}

/// Returns the router for the script editor.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_script))
        .route("/tagline", put(set_tagline))
        .route("/initial-step", put(set_initial_step))
        .route("/steps", post(add_step))
        .route("/steps/{index}", delete(remove_step))
        .route("/steps/{index}/text", put(update_step_text))
        .route("/steps/{index}/evil", put(update_step_evil))
        .route("/export", get(export_script))
        .route("/import", post(import_script))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use taxbot_playback::application::conversation::Conversation;
    use taxbot_playback::domain::timing::PlaybackTiming;
    use taxbot_test_support::{ManualScheduler, single_step_script};
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        AppState::new(Conversation::new(
            single_step_script(),
            Box::new(ManualScheduler::new()),
            PlaybackTiming::default(),
        ))
    }

    async fn json_of(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_update_step_text_returns_edited_script() {
        // Arrange
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("PUT")
            .uri("/steps/0/text")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "Edited"}"#))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["applied"], true);
        assert_eq!(json["script"]["steps"][0]["text"], "Edited");
    }

    #[tokio::test]
    async fn test_remove_missing_step_is_not_applied() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("DELETE")
            .uri("/steps/9")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["applied"], false);
        assert_eq!(json["script"]["steps"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_sets_attachment_headers() {
        // Arrange
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("GET")
            .uri("/export")
            .body(Body::empty())
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"taxbot-script.json\""
        );
        let json = json_of(response).await;
        assert_eq!(json["version"], 1);
        assert_eq!(json["initialStep"]["text"], "Hi");
    }

    #[tokio::test]
    async fn test_import_without_steps_returns_400() {
        // Arrange
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/import")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_of(response).await;
        assert_eq!(json["error"], "import_error");
        assert_eq!(json["message"], "import failed: missing steps");
    }

    #[tokio::test]
    async fn test_import_string_array_returns_status_and_script() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/import")
            .body(Body::from(r#"["hi", "bye"]"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["status"], "Imported 2 script steps.");
        assert_eq!(json["script"]["steps"][1]["text"], "bye");
        assert_eq!(json["script"]["steps"][1]["evil"], false);
    }
}
