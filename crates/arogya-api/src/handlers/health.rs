//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use arogya_core::UserId;
use arogya_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    // Any lookup that completes means the directory is answering
    let directory_healthy = match UserId::parse("readiness-probe") {
        Ok(probe) => ctx.user_repo().find_by_id(&probe).await.is_ok(),
        Err(_) => false,
    };

    let response = ReadinessResponse::ready(
        directory_healthy,
        ctx.credentials().active_count(),
        ctx.events().subscriber_count(),
    );
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
