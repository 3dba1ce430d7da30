//! Capability checks
//!
//! Every mutating credential operation demands a capability value. The only
//! way to obtain one is through [`Authorizer`], which checks the principal's
//! role permissions and their relationship to the appointment.

use arogya_core::{
    Appointment, AppointmentId, Credential, DomainError, Permissions, Role, SubjectId, UserId,
};
use tracing::debug;

/// Authenticated caller, as established by the session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
    pub permissions: Permissions,
}

impl Principal {
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            permissions: role.permissions(),
        }
    }

    /// Fail with `MissingPermission` unless every flag in `required` is held
    ///
    /// # Errors
    /// Returns `DomainError::MissingPermission` naming the missing flags
    pub fn require(&self, required: Permissions) -> Result<(), DomainError> {
        if self.permissions.has(required) {
            Ok(())
        } else {
            let missing = required.difference(self.permissions);
            Err(DomainError::MissingPermission(missing.to_string()))
        }
    }
}

/// Proof that a principal may issue and revoke credentials for one subject
#[derive(Debug, Clone)]
pub struct IssueCapability {
    issuer: UserId,
    subject: SubjectId,
}

impl IssueCapability {
    pub(crate) fn new(issuer: UserId, subject: SubjectId) -> Self {
        Self { issuer, subject }
    }

    pub fn issuer(&self) -> &UserId {
        &self.issuer
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }
}

/// Proof that a principal may validate presented credentials
#[derive(Debug, Clone)]
pub struct ValidateCapability {
    validator: UserId,
}

impl ValidateCapability {
    pub(crate) fn new(validator: UserId) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &UserId {
        &self.validator
    }
}

/// Proof that a doctor holds a confirmed credential for an appointment
/// they are booked on, and may therefore write its report
#[derive(Debug, Clone)]
pub struct ReportCapability {
    appointment: Appointment,
    credential: Credential,
}

impl ReportCapability {
    /// The resolved credential that confirmed the doctor's access
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn appointment(&self) -> &Appointment {
        &self.appointment
    }

    pub fn doctor_id(&self) -> &UserId {
        &self.appointment.doctor_id
    }

    pub fn patient_id(&self) -> &UserId {
        &self.appointment.patient_id
    }
}

/// Grants capabilities after checking permissions and ownership
#[derive(Debug, Clone, Copy, Default)]
pub struct Authorizer;

impl Authorizer {
    /// Only the appointment's own patient may issue for it, and never for a
    /// cancelled appointment.
    ///
    /// # Errors
    /// `MissingPermission`, `NotAppointmentPatient`, or `AppointmentCancelled`
    pub fn issue_capability(
        &self,
        principal: &Principal,
        appointment: &Appointment,
    ) -> Result<IssueCapability, DomainError> {
        principal.require(Permissions::ISSUE_CREDENTIAL)?;

        if appointment.patient_id != principal.user_id {
            debug!(
                user_id = %principal.user_id,
                appointment_id = %appointment.id,
                "Issue refused: not the appointment's patient"
            );
            return Err(DomainError::NotAppointmentPatient);
        }

        if appointment.is_cancelled() {
            return Err(DomainError::AppointmentCancelled);
        }

        Ok(IssueCapability::new(
            principal.user_id.clone(),
            SubjectId::from(&appointment.id),
        ))
    }

    /// # Errors
    /// `MissingPermission` unless the principal may validate credentials
    pub fn validate_capability(&self, principal: &Principal) -> Result<ValidateCapability, DomainError> {
        principal.require(Permissions::VALIDATE_CREDENTIAL)?;
        Ok(ValidateCapability::new(principal.user_id.clone()))
    }

    /// `credential` must be the one a successful resolve returned.
    ///
    /// # Errors
    /// `MissingPermission`, `InvalidCredential` if the credential belongs to a
    /// different appointment, or `NotAppointmentDoctor`
    pub fn report_capability(
        &self,
        principal: &Principal,
        credential: &Credential,
        appointment: &Appointment,
    ) -> Result<ReportCapability, DomainError> {
        principal.require(Permissions::CREATE_REPORT)?;

        if AppointmentId::from(&credential.subject_id) != appointment.id {
            return Err(DomainError::InvalidCredential);
        }

        if appointment.doctor_id != principal.user_id {
            return Err(DomainError::NotAppointmentDoctor);
        }

        Ok(ReportCapability {
            appointment: appointment.clone(),
            credential: credential.clone(),
        })
    }
}
