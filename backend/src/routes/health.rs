//! Health check endpoints
//!
//! - /health - process is up
//! - /health/ready - database reachable, 503 otherwise
//! - /health/live - liveness probe

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<CheckStatus>,
}

/// Status of the database check
#[derive(Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn response(status: &'static str, database: Option<CheckStatus>) -> HealthResponse {
    HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(response("healthy", None))
}

/// Readiness probe
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(state.db()).await {
        Ok(()) => Ok(Json(response(
            "ready",
            Some(CheckStatus {
                healthy: true,
                message: None,
            }),
        ))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(response(
                "not_ready",
                Some(CheckStatus {
                    healthy: false,
                    message: Some(e.to_string()),
                }),
            )),
        )),
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(response("alive", None))
}
