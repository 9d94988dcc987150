// HTTP request handlers
use crate::application::error::EngineError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn error_response(err: EngineError) -> Response {
    let status = match err {
        EngineError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Discovery(_) | EngineError::Publish { .. } => StatusCode::BAD_GATEWAY,
    };
    tracing::error!("Dashboard run failed: {}", err);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// The document that would be published, without publishing it
pub async fn preview_dashboard(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.synthesize().await {
        Ok(synthesis) => Json(synthesis.document).into_response(),
        Err(e) => error_response(e),
    }
}

/// Rebuild and publish the dashboard
pub async fn refresh_dashboard(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.refresh().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(e),
    }
}
