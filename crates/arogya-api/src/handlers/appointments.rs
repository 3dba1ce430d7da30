//! Appointment handlers

use axum::{extract::State, Json};
use arogya_service::dto::AppointmentResponse;
use arogya_service::AppointmentService;

use crate::extractors::{AppointmentPath, AuthUser};
use crate::response::ApiResult;
use crate::state::AppState;

/// List the caller's appointments
///
/// GET /appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<AppointmentResponse>>> {
    let service = AppointmentService::new(state.service_context());
    let response = service.list(&auth.principal).await?;
    Ok(Json(response))
}

/// Get one of the caller's appointments
///
/// GET /appointments/{appointment_id}
pub async fn get_appointment(
    State(state): State<AppState>,
    auth: AuthUser,
    AppointmentPath(appointment_id): AppointmentPath,
) -> ApiResult<Json<AppointmentResponse>> {
    let service = AppointmentService::new(state.service_context());
    let appointment = service.get(&auth.principal, &appointment_id).await?;
    Ok(Json(service.to_response(&auth.principal, &appointment)))
}
