//! goal-tasks - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the task generation API.

use goal_tasks::{api, config::Config};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goal_tasks=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, max_attempts={}, temperatures={:?}",
        config.model, config.max_attempts, config.temperatures
    );
    if std::env::var(&config.api_key_var).is_err() {
        warn!(
            "{} is not set yet; generation requests will fail until it is",
            config.api_key_var
        );
    }

    api::serve(config).await?;

    Ok(())
}
