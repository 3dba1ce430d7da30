//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use arogya_core::Role;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Account signup request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    pub role: Role,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    /// Doctors only
    #[validate(length(max = 100, message = "Specialization must be at most 100 characters"))]
    pub specialization: Option<String>,

    /// Doctors only
    #[validate(length(max = 200, message = "Hospital must be at most 200 characters"))]
    pub hospital: Option<String>,
}

/// Login request; the role must match the account's role
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub role: Role,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// Credential Requests
// ============================================================================

/// A doctor presents the token read from the patient's QR code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ValidateCredentialRequest {
    #[validate(length(min = 1, max = 256, message = "Token must be 1-256 characters"))]
    pub token: String,
}

// ============================================================================
// Report Requests
// ============================================================================

/// Create a medical report for the appointment a credential was issued for
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// Token from the patient's QR code
    #[validate(length(min = 1, max = 256, message = "Token must be 1-256 characters"))]
    pub token: String,

    #[validate(length(min = 1, max = 2000, message = "Diagnosis must be 1-2000 characters"))]
    pub diagnosis: String,

    #[validate(length(min = 1, max = 2000, message = "Prescription must be 1-2000 characters"))]
    pub prescription: String,

    #[validate(length(max = 4000, message = "Notes must be at most 4000 characters"))]
    pub notes: Option<String>,

    /// Print the doctor's hospital letterhead on the report
    #[serde(default = "default_use_letterhead")]
    pub use_letterhead: bool,

    #[validate(nested)]
    pub letterhead: Option<LetterheadRequest>,
}

fn default_use_letterhead() -> bool {
    true
}

/// Letterhead details that are not on the doctor's profile
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LetterheadRequest {
    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    #[serde(default)]
    pub address: String,

    #[validate(length(max = 300, message = "Contact info must be at most 300 characters"))]
    #[serde(default)]
    pub contact_info: String,

    #[validate(length(max = 300, message = "Footer must be at most 300 characters"))]
    pub footer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_validation() {
        let request: SignupRequest = serde_json::from_value(serde_json::json!({
            "role": "patient",
            "name": "Test Patient",
            "email": "not-an-email",
            "password": "short"
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_login_requires_known_role() {
        let parsed: Result<LoginRequest, _> = serde_json::from_value(serde_json::json!({
            "email": "aarav@example.com",
            "password": "Password123",
            "role": "admin"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_report_defaults_to_letterhead() {
        let request: CreateReportRequest = serde_json::from_value(serde_json::json!({
            "token": "AROGYA-abc",
            "diagnosis": "Hypertension",
            "prescription": "Rest"
        }))
        .unwrap();
        assert!(request.use_letterhead);
        assert!(request.letterhead.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        let request = ValidateCredentialRequest {
            token: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
