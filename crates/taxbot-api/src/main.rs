//! Taxbot-5000 API server entry point.

use std::sync::Arc;

use taxbot_api::config::AppConfig;
use taxbot_api::driver::spawn_timer_driver;
use taxbot_api::error::AppError;
use taxbot_api::scheduler::TokioScheduler;
use taxbot_api::state::AppState;
use taxbot_playback::application::command_handlers;
use taxbot_playback::application::conversation::Conversation;
use taxbot_script::domain::script::Script;
use tokio::runtime::Handle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Taxbot-5000 API server");

    // Read configuration from environment.
    let config = AppConfig::from_env()?;

    // Build the conversation and the task that feeds it fired timers.
    let (scheduler, fired) = TokioScheduler::channel(Handle::current());
    let conversation = Conversation::new(Script::default(), Box::new(scheduler), config.timing);
    let app_state = AppState::new(conversation);
    let driver = spawn_timer_driver(Arc::clone(&app_state.conversation), fired);
    let conversation = Arc::clone(&app_state.conversation);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = taxbot_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(err) = command_handlers::handle_dispose(&conversation) {
        tracing::warn!(error = %err, "conversation could not be disposed");
    }
    driver.abort();
    tracing::info!("Taxbot-5000 API server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
