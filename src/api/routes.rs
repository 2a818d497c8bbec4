//! HTTP routing and server lifecycle.

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generation::{GenerationSettings, TaskGenerator};
use crate::llm::OpenAiProvider;

use super::tasks;
use super::types::HealthResponse;

/// Shared application state. Immutable after startup.
pub struct AppState {
    pub config: Config,
    pub generator: TaskGenerator,
}

/// Build the application router.
///
/// CORS is permissive: the endpoint is called straight from a browser-hosted
/// client on another origin.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate-tasks", post(tasks::generate_tasks))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let provider = Arc::new(OpenAiProvider::from_config(&config)?);
    let generator = TaskGenerator::new(provider, GenerationSettings::from_config(&config));

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState { config, generator });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.generator.settings().model.clone(),
        max_attempts: state.config.max_attempts,
    })
}
