use axum::{extract::State, http::header, response::IntoResponse, Extension, Json};
use taskgate_authz::Principal;
use tracing::info;

use crate::{
    error::{ApiError, Result},
    state::AppState,
    HealthResponse,
};

pub const GET_TASK_BODY: &str = "Access Granted: Get a Task";
pub const UPDATE_TASK_BODY: &str = "Access Granted: Update a Task";

/// `GET /task`, guarded by the read scope
pub async fn get_task(Extension(principal): Extension<Principal>) -> &'static str {
    info!(principal = %principal.id, "Task read");
    GET_TASK_BODY
}

/// `POST /task`, guarded by the update scope
pub async fn update_task(Extension(principal): Extension<Principal>) -> &'static str {
    info!(principal = %principal.id, "Task updated");
    UPDATE_TASK_BODY
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Prometheus scrape endpoint
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::InternalError(format!("{:#}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
