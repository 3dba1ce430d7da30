//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{AppointmentId, IdParseError, ReportId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Appointment not found: {0}")]
    AppointmentNotFound(AppointmentId),

    #[error("Report not found: {0}")]
    ReportNotFound(ReportId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdParseError),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Not the patient of this appointment")]
    NotAppointmentPatient,

    #[error("Not the doctor of this appointment")]
    NotAppointmentDoctor,

    /// Presented credential did not resolve. Expired and unknown tokens are
    /// reported identically.
    #[error("Credential is invalid or has expired")]
    InvalidCredential,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Appointment has been cancelled")]
    AppointmentCancelled,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::AppointmentNotFound(_) => "UNKNOWN_APPOINTMENT",
            Self::ReportNotFound(_) => "UNKNOWN_REPORT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::NotAppointmentPatient => "NOT_APPOINTMENT_PATIENT",
            Self::NotAppointmentDoctor => "NOT_APPOINTMENT_DOCTOR",
            Self::InvalidCredential => "INVALID_CREDENTIAL",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Business Rules
            Self::AppointmentCancelled => "APPOINTMENT_CANCELLED",

            // Infrastructure
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::AppointmentNotFound(_) | Self::ReportNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidId(_) | Self::InvalidEmail | Self::WeakPassword(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::MissingPermission(_)
                | Self::NotAppointmentPatient
                | Self::NotAppointmentDoctor
                | Self::InvalidCredential
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::AppointmentCancelled)
    }
}
