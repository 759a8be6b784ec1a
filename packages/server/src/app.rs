//! Application setup and router construction.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::routes::{health_handler, process_handler, root_handler, AppState};

/// Build the application router.
pub fn build_app(config: AppConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/process", post(process_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
