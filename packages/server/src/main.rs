// Main entry point for the announcement pipeline API server

mod app;
mod config;
mod routes;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::build_app;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting announcement pipeline API");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        openai_configured = config.openai_api_key.is_some(),
        email_configured = config.email.is_some(),
        "Configuration loaded"
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let app = build_app(config);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
