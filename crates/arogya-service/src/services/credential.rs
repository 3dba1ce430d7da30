//! Credential use cases
//!
//! Looks up the appointment, asks the authorizer for the matching capability,
//! and hands it to the credential store. Results are mapped to DTOs here so
//! the HTTP layer never touches a raw [`Credential`].

use std::collections::HashSet;

use arogya_core::{
    Appointment, AppointmentId, Credential, DomainError, Permissions, Role, SubjectId,
};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::authorization::{IssueCapability, Principal};
use crate::dto::{CredentialResponse, ValidateCredentialRequest, ValidateCredentialResponse};
use crate::qr;

use super::appointment::AppointmentService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct CredentialService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CredentialService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a new credential for one of the patient's appointments
    ///
    /// Re-issuing supersedes whatever was active for the appointment.
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn issue(
        &self,
        principal: &Principal,
        appointment_id: &AppointmentId,
    ) -> ServiceResult<CredentialResponse> {
        let capability = self.issue_capability(principal, appointment_id).await?;
        let credential = self.ctx.credentials().issue(&capability);
        self.to_response(&credential)
    }

    /// The appointment's live credential, if any
    pub async fn active(
        &self,
        principal: &Principal,
        appointment_id: &AppointmentId,
    ) -> ServiceResult<CredentialResponse> {
        let capability = self.issue_capability(principal, appointment_id).await?;
        let credential = self
            .ctx
            .credentials()
            .active(capability.subject())
            .ok_or_else(|| ServiceError::not_found("Credential", appointment_id))?;
        self.to_response(&credential)
    }

    /// Withdraw the appointment's live credential
    #[instrument(skip(self, principal), fields(user_id = %principal.user_id))]
    pub async fn revoke(&self, principal: &Principal, appointment_id: &AppointmentId) -> ServiceResult<()> {
        let capability = self.issue_capability(principal, appointment_id).await?;
        self.ctx
            .credentials()
            .revoke(&capability)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("Credential", appointment_id))
    }

    /// SVG QR code for the appointment's live credential
    pub async fn qr_svg(&self, principal: &Principal, appointment_id: &AppointmentId) -> ServiceResult<String> {
        let capability = self.issue_capability(principal, appointment_id).await?;
        let credential = self
            .ctx
            .credentials()
            .active(capability.subject())
            .ok_or_else(|| ServiceError::not_found("Credential", appointment_id))?;
        qr::render_svg(&credential.token)
    }

    /// Check a scanned token
    ///
    /// A rejected token is not an error: the response just says
    /// `valid: false`. Appointment details are only attached when the
    /// validating doctor is booked on that appointment. Checking never
    /// spends the credential, even in single-use mode.
    #[instrument(skip(self, principal, request), fields(user_id = %principal.user_id))]
    pub async fn validate(
        &self,
        principal: &Principal,
        request: ValidateCredentialRequest,
    ) -> ServiceResult<ValidateCredentialResponse> {
        request.validate()?;
        let capability = self.ctx.authorizer().validate_capability(principal)?;

        let Some(credential) = self.ctx.credentials().resolve(&capability, request.token.trim()) else {
            info!(valid = false, "Credential validated");
            return Ok(ValidateCredentialResponse::invalid());
        };
        info!(valid = true, subject_id = %credential.subject_id, "Credential validated");

        let appointment = self
            .ctx
            .appointment_repo()
            .find_by_id(&AppointmentId::from(&credential.subject_id))
            .await?
            .filter(|appointment| appointment.doctor_id == principal.user_id)
            .map(|appointment| {
                AppointmentService::new(self.ctx).to_response(principal, &appointment)
            });
        if appointment.is_none() {
            debug!(subject_id = %credential.subject_id, "Validating doctor is not on the appointment");
        }

        Ok(ValidateCredentialResponse {
            valid: true,
            appointment,
            expires_at: Some(credential.expires_at),
        })
    }

    /// Subjects whose credential events the principal may observe
    ///
    /// Patients see events for their own appointments; doctors see none.
    pub async fn subject_ids_for(&self, principal: &Principal) -> ServiceResult<HashSet<SubjectId>> {
        if principal.role != Role::Patient {
            return Ok(HashSet::new());
        }
        principal.require(Permissions::ISSUE_CREDENTIAL)?;

        let appointments = self
            .ctx
            .appointment_repo()
            .find_by_patient(&principal.user_id)
            .await?;
        Ok(appointments
            .iter()
            .map(|appointment| SubjectId::from(&appointment.id))
            .collect())
    }

    async fn issue_capability(
        &self,
        principal: &Principal,
        appointment_id: &AppointmentId,
    ) -> ServiceResult<IssueCapability> {
        let appointment: Appointment = self
            .ctx
            .appointment_repo()
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| DomainError::AppointmentNotFound(appointment_id.clone()))?;

        Ok(self.ctx.authorizer().issue_capability(principal, &appointment)?)
    }

    fn to_response(&self, credential: &Credential) -> ServiceResult<CredentialResponse> {
        let now = self.ctx.credentials().now();
        Ok(CredentialResponse {
            credential_id: credential.id,
            appointment_id: credential.subject_id.to_string(),
            token: credential.token.as_str().to_owned(),
            state: self.ctx.credentials().state(credential),
            issued_at: credential.issued_at,
            expires_at: credential.expires_at,
            expires_in: credential.time_remaining(now).num_seconds(),
            qr_svg: qr::render_svg(&credential.token)?,
        })
    }
}
