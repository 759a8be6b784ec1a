//! HTTP handlers for the announcement pipeline.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use announcements::traits::Notifier;
use announcements::{
    run_pipeline, HttpDocumentFetcher, HttpSource, OpenAiSummarizer, RunReport, SampleSource,
    SourceFetcher,
};
use mailer::SmtpMailer;
use report::PdfReportRenderer;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Query parameters for `POST /process`.
#[derive(Debug, Deserialize)]
pub struct ProcessParams {
    #[serde(default)]
    pub test_mode: bool,

    #[serde(default)]
    pub use_sample_data: bool,

    #[serde(default)]
    pub notify: bool,

    /// Raw cookie header overriding the configured one
    pub cookie_header: Option<String>,
}

fn config_error(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": detail,
            "timestamp": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })),
    )
        .into_response()
}

/// Root endpoint with basic information.
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Announcement Pipeline API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/process": "POST - Process announcements and optionally send the report",
            "/health": "GET - Health check",
        }
    }))
}

/// Health check reporting which credential groups are configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "openai_configured": state.config.openai_api_key.is_some(),
        "email_configured": state.config.email.is_some(),
        "cookie_configured": state.config.source_cookie_header.is_some(),
    }))
}

/// Run the pipeline and report the outcome.
///
/// Validates collaborator credentials before any work starts: a missing
/// OpenAI key (or missing SMTP settings when `notify` is set) fails fast
/// with a configuration-error response.
pub async fn process_handler(
    State(state): State<AppState>,
    Query(params): Query<ProcessParams>,
) -> Response {
    let config = &state.config;

    let Some(api_key) = config.openai_api_key.as_deref() else {
        return config_error(
            "OpenAI API key not configured. Please set OPENAI_API_KEY in environment variables.",
        );
    };
    if params.notify && config.email.is_none() {
        return config_error(
            "Email not configured. Please set EMAIL_SENDER, EMAIL_PASSWORD, and EMAIL_RECIPIENTS.",
        );
    }

    let start = Instant::now();
    let result = execute_run(config, api_key, &params).await;
    let elapsed = start.elapsed();

    match result {
        Ok(run) => Json(json!({
            "success": true,
            "processing_time_seconds": (elapsed.as_secs_f64() * 100.0).round() / 100.0,
            "test_mode": params.test_mode,
            "sample_data_used": params.use_sample_data,
            "notify": params.notify,
            "timestamp": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "run": run,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "Pipeline run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": format!("Error processing announcements: {e}"),
                    "timestamp": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Build the collaborators this run needs and execute the pipeline.
async fn execute_run(
    config: &AppConfig,
    api_key: &str,
    params: &ProcessParams,
) -> announcements::Result<RunReport> {
    let pipeline_config = config.pipeline_config().with_test_mode(params.test_mode);

    let source: Box<dyn SourceFetcher> = if params.use_sample_data {
        Box::new(SampleSource)
    } else {
        let mut source = HttpSource::new(&config.source_announcements_url, &config.user_agent);
        let cookie = params
            .cookie_header
            .clone()
            .or_else(|| config.source_cookie_header.clone());
        if let Some(cookie) = cookie {
            source = source.with_cookie_header(cookie);
        }
        Box::new(source)
    };

    let documents = HttpDocumentFetcher::new(&config.user_agent);
    let summarizer = OpenAiSummarizer::new(api_key, &config.openai_model)
        .with_max_tokens(config.openai_max_tokens)
        .with_temperature(config.openai_temperature);
    let renderer = PdfReportRenderer::default();

    let notifier = if params.notify {
        config
            .email
            .as_ref()
            .map(|email| SmtpMailer::new(email.mailer_options()))
    } else {
        None
    };

    run_pipeline(
        &pipeline_config,
        source.as_ref(),
        &documents,
        &summarizer,
        &renderer,
        notifier.as_ref().map(|n| n as &dyn Notifier),
    )
    .await
}
