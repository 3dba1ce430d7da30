//! Server setup and initialization
//!
//! Builds the in-memory directory, the credential engine, and the router.

use std::sync::Arc;

use axum::Router;
use arogya_common::{AppConfig, AppError, JwtService};
use arogya_service::repositories::{
    seed_demo_data, InMemoryAppointmentRepository, InMemoryReportRepository, InMemoryUserRepository,
};
use arogya_service::{CredentialStoreConfig, ServiceContext};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// # Errors
/// Returns `AppError::Config` if the rate limit settings are unusable
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_rate_limit(create_router(), &config.rate_limit)?;
    let router = apply_middleware(
        api.merge(health_routes()),
        &config.cors,
        config.app.env.is_production(),
    );
    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
///
/// Must run inside a tokio runtime: the credential engine spawns its expiry
/// tasks there.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let users = Arc::new(InMemoryUserRepository::new());
    let appointments = Arc::new(InMemoryAppointmentRepository::new());
    let reports = Arc::new(InMemoryReportRepository::new());

    if config.app.seed_demo_data {
        seed_demo_data(&users, &appointments, &reports).await?;
        info!(users = users.len(), "Demo directory seeded");
    }

    let credential_config = CredentialStoreConfig {
        window: chrono::Duration::try_seconds(config.credentials.ttl_secs)
            .ok_or_else(|| AppError::Config("CREDENTIAL_TTL_SECS is out of range".to_string()))?,
        single_use: config.credentials.single_use,
    };

    let service_context = ServiceContext::builder()
        .user_repo(users)
        .appointment_repo(appointments)
        .report_repo(reports)
        .jwt_service(jwt_service)
        .credential_config(credential_config)
        .event_capacity(config.credentials.event_capacity)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on an already-bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Listener has no address: {e}")))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    run_server(app, listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
