//! Credential handlers
//!
//! Patients issue, inspect, and revoke the QR credential for their own
//! appointments. Doctors submit scanned tokens for validation. A rejected
//! token is a normal `200` with `valid: false`.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use arogya_core::Permissions;
use arogya_service::dto::{CredentialResponse, ValidateCredentialRequest, ValidateCredentialResponse};
use arogya_service::CredentialService;
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::extractors::{AppointmentPath, AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent, Svg};
use crate::state::AppState;

/// Issue a credential, superseding any active one
///
/// POST /appointments/{appointment_id}/credential
pub async fn issue_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    AppointmentPath(appointment_id): AppointmentPath,
) -> ApiResult<Created<Json<CredentialResponse>>> {
    let service = CredentialService::new(state.service_context());
    let response = service.issue(&auth.principal, &appointment_id).await?;
    Ok(Created(Json(response)))
}

/// Get the active credential
///
/// GET /appointments/{appointment_id}/credential
pub async fn get_active_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    AppointmentPath(appointment_id): AppointmentPath,
) -> ApiResult<Json<CredentialResponse>> {
    let service = CredentialService::new(state.service_context());
    let response = service.active(&auth.principal, &appointment_id).await?;
    Ok(Json(response))
}

/// Revoke the active credential
///
/// DELETE /appointments/{appointment_id}/credential
pub async fn revoke_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    AppointmentPath(appointment_id): AppointmentPath,
) -> ApiResult<NoContent> {
    let service = CredentialService::new(state.service_context());
    service.revoke(&auth.principal, &appointment_id).await?;
    Ok(NoContent)
}

/// QR image of the active credential
///
/// GET /appointments/{appointment_id}/credential/qr.svg
pub async fn credential_qr(
    State(state): State<AppState>,
    auth: AuthUser,
    AppointmentPath(appointment_id): AppointmentPath,
) -> ApiResult<Svg> {
    let service = CredentialService::new(state.service_context());
    let svg = service.qr_svg(&auth.principal, &appointment_id).await?;
    Ok(Svg(svg))
}

/// Validate a scanned token
///
/// POST /credentials/validate
pub async fn validate_credential(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ValidateCredentialRequest>,
) -> ApiResult<Json<ValidateCredentialResponse>> {
    let service = CredentialService::new(state.service_context());
    let response = service.validate(&auth.principal, request).await?;
    Ok(Json(response))
}

/// Server-sent credential lifecycle events for the caller's appointments
///
/// GET /credentials/events
pub async fn credential_events(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    auth.principal.require(Permissions::ISSUE_CREDENTIAL)?;

    let ctx = state.service_context();
    let subjects = CredentialService::new(ctx).subject_ids_for(&auth.principal).await?;
    let receiver = ctx.credentials().subscribe();
    debug!(user_id = %auth.user_id(), subjects = subjects.len(), "Event stream opened");

    let events = stream::unfold((receiver, subjects), |(mut receiver, subjects)| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if !event.subject_id().is_some_and(|s| subjects.contains(s)) {
                        continue;
                    }
                    match Event::default().event(event.event_type()).json_data(&event) {
                        Ok(sse) => return Some((Ok(sse), (receiver, subjects))),
                        Err(e) => warn!(error = %e, "Failed to encode credential event"),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
