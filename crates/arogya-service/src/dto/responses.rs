//! Response DTOs for API endpoints

use arogya_core::{AppointmentStatus, CredentialState, Letterhead, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(pair: arogya_common::TokenPair, user: CurrentUserResponse) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            user,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// Current user, including email
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_profile: Option<DoctorProfileResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorProfileResponse {
    pub specialization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    pub consultation_fee: u32,
    pub report_fee: u32,
}

// ============================================================================
// Appointment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub total_fee: u32,
    /// Expiry of the appointment's active credential, if one is live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Credential Responses
// ============================================================================

/// Credential as shown to the patient who issued it
#[derive(Debug, Clone, Serialize)]
pub struct CredentialResponse {
    pub credential_id: Uuid,
    pub appointment_id: String,
    /// The value encoded in the QR code
    pub token: String,
    pub state: CredentialState,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
    /// QR code as an SVG document
    pub qr_svg: String,
}

/// Outcome of a doctor scanning a code
///
/// `valid: false` covers unknown, expired, superseded, and revoked tokens
/// alike.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateCredentialResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ValidateCredentialResponse {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            appointment: None,
            expires_at: None,
        }
    }
}

// ============================================================================
// Report Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    pub patient_id: String,
    pub doctor_id: String,
    pub hospital_name: String,
    pub diagnosis: String,
    pub prescription: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letterhead: Option<Letterhead>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub directory: String,
    pub active_credentials: usize,
    pub event_subscribers: usize,
}

impl ReadinessResponse {
    pub fn ready(directory_healthy: bool, active_credentials: usize, event_subscribers: usize) -> Self {
        Self {
            status: if directory_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                directory: if directory_healthy { "healthy" } else { "unhealthy" }.to_string(),
                active_credentials,
                event_subscribers,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
