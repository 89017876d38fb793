//! Taxbot-5000 API: the HTTP adapter the chat View binds to.
//!
//! The library half exposes the router and its building blocks so
//! integration tests can assemble the same app `main.rs` serves.

use axum::Router;

pub mod config;
pub mod driver;
pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;

use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/chat", routes::chat::router())
        .nest("/api/v1/script", routes::script::router())
        .with_state(app_state)
}
