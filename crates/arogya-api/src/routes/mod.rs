//! Route definitions
//!
//! All API routes are mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{appointments, auth, credentials, health, reports, users};
use crate::state::AppState;

/// Base path of every route
pub const API_PREFIX: &str = "/api/v1";

/// Rate-limited API routes
pub fn create_router() -> Router<AppState> {
    Router::new().nest(API_PREFIX, api_v1_routes())
}

/// Health check routes, kept apart so probes bypass rate limiting
pub fn health_routes() -> Router<AppState> {
    Router::new().nest(
        API_PREFIX,
        Router::new()
            .route("/health", get(health::health_check))
            .route("/health/ready", get(health::readiness_check)),
    )
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(appointment_routes())
        .merge(credential_routes())
        .merge(report_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users/@me", get(users::get_current_user))
}

fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(appointments::list_appointments))
        .route("/appointments/:appointment_id", get(appointments::get_appointment))
        .route(
            "/appointments/:appointment_id/credential",
            post(credentials::issue_credential)
                .get(credentials::get_active_credential)
                .delete(credentials::revoke_credential),
        )
        .route(
            "/appointments/:appointment_id/credential/qr.svg",
            get(credentials::credential_qr),
        )
}

fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/credentials/validate", post(credentials::validate_credential))
        .route("/credentials/events", get(credentials::credential_events))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(reports::create_report).get(reports::list_reports))
        .route("/reports/:report_id", get(reports::get_report))
}
