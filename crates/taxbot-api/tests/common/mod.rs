//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use taxbot_playback::application::command_handlers;
use taxbot_playback::application::conversation::Conversation;
use taxbot_playback::domain::timing::PlaybackTiming;
use taxbot_script::domain::script::Script;
use taxbot_test_support::{ManualScheduler, single_step_script};
use tower::ServiceExt;

use taxbot_api::build_router;
use taxbot_api::state::AppState;

/// The full app plus the virtual clock driving its timers.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub scheduler: ManualScheduler,
}

impl TestApp {
    /// Advances virtual time, delivering every timer that falls due.
    pub fn advance(&self, millis: u64) {
        self.scheduler
            .advance(Duration::from_millis(millis), |handle| {
                command_handlers::handle_timer_fired(&self.state.conversation, handle).unwrap();
            });
    }

    /// Poisons the conversation lock by panicking while holding it.
    pub fn poison(&self) {
        let conversation = std::sync::Arc::clone(&self.state.conversation);
        let _ = std::thread::spawn(move || {
            let _guard = conversation.lock().unwrap();
            panic!("poison the conversation lock");
        })
        .join();
    }

    /// A fresh handle on the router for one request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full app router over `script` with a manual scheduler. Uses the
/// same route structure as `main.rs`.
pub fn build_test_app_with(script: Script) -> TestApp {
    let scheduler = ManualScheduler::new();
    let conversation = Conversation::new(
        script,
        Box::new(scheduler.clone()),
        PlaybackTiming::default(),
    );
    let state = AppState::new(conversation);
    TestApp {
        router: build_router(state.clone()),
        state,
        scheduler,
    }
}

/// Build the full app over the single-step fixture script.
pub fn build_test_app() -> TestApp {
    build_test_app_with(single_step_script())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a POST request with a raw text body and return the response.
pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    send(app, request).await
}

/// Send a bodiless request with `method` and return the response.
pub async fn empty_request(
    app: Router,
    method: &str,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    empty_request(app, "GET", uri).await
}
