//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use arogya_core::{AppointmentId, ReportId};

use crate::response::ApiError;

/// `:appointment_id` parsed into an [`AppointmentId`]
#[derive(Debug, Clone)]
pub struct AppointmentPath(pub AppointmentId);

#[async_trait]
impl<S> FromRequestParts<S> for AppointmentPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        AppointmentId::parse(raw)
            .map(AppointmentPath)
            .map_err(|_| ApiError::invalid_path("Invalid appointment_id"))
    }
}

/// `:report_id` parsed into a [`ReportId`]
#[derive(Debug, Clone)]
pub struct ReportPath(pub ReportId);

#[async_trait]
impl<S> FromRequestParts<S> for ReportPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        ReportId::parse(raw)
            .map(ReportPath)
            .map_err(|_| ApiError::invalid_path("Invalid report_id"))
    }
}
