//! Appointment service

use arogya_core::{Appointment, AppointmentId, DomainError, Permissions, Role, SubjectId};
use tracing::instrument;

use crate::authorization::Principal;
use crate::dto::AppointmentResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Appointment listing and lookup, scoped to the caller
pub struct AppointmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AppointmentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's appointments, soonest first
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn list(&self, principal: &Principal) -> ServiceResult<Vec<AppointmentResponse>> {
        principal.require(Permissions::VIEW_APPOINTMENTS)?;

        let repo = self.ctx.appointment_repo();
        let appointments = match principal.role {
            Role::Patient => repo.find_by_patient(&principal.user_id).await?,
            Role::Doctor => repo.find_by_doctor(&principal.user_id).await?,
        };

        Ok(appointments
            .iter()
            .map(|appointment| self.to_response(principal, appointment))
            .collect())
    }

    /// Fetch an appointment the caller takes part in
    ///
    /// Appointments the caller is not on are reported as not found.
    pub async fn get(&self, principal: &Principal, id: &AppointmentId) -> ServiceResult<Appointment> {
        self.ctx
            .appointment_repo()
            .find_by_id(id)
            .await?
            .filter(|appointment| appointment.involves(&principal.user_id))
            .ok_or_else(|| DomainError::AppointmentNotFound(id.clone()).into())
    }

    /// Map to a response; only the patient sees credential expiry
    pub fn to_response(&self, principal: &Principal, appointment: &Appointment) -> AppointmentResponse {
        let mut response = AppointmentResponse::from(appointment);
        if appointment.patient_id == principal.user_id {
            response.credential_expires_at = self
                .ctx
                .credentials()
                .active(&SubjectId::from(&appointment.id))
                .map(|credential| credential.expires_at);
        }
        response
    }
}
