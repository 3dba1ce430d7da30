//! Test fixtures
//!
//! Request bodies and response shapes for the seeded demo directory.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Password of every seeded account
pub const DEMO_PASSWORD: &str = "Password123";

static COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl LoginRequest {
    fn demo(email: &str, role: &str) -> Self {
        Self {
            email: email.to_string(),
            password: DEMO_PASSWORD.to_string(),
            role: role.to_string(),
        }
    }

    /// Aarav Singh, patient on appointment a1 with Dr. Sharma
    pub fn aarav() -> Self {
        Self::demo("aarav@example.com", "patient")
    }

    /// Meera Desai, patient on appointment a2 with Dr. Patel
    pub fn meera() -> Self {
        Self::demo("meera@example.com", "patient")
    }

    /// Dr. Rajiv Sharma, doctor on a1
    pub fn dr_sharma() -> Self {
        Self::demo("rajiv.sharma@arogyamitra.com", "doctor")
    }

    /// Dr. Priya Patel, doctor on a2
    pub fn dr_patel() -> Self {
        Self::demo("priya.patel@arogyamitra.com", "doctor")
    }
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub role: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
}

impl SignupRequest {
    pub fn unique_patient() -> Self {
        let suffix = unique_suffix();
        Self {
            role: "patient".to_string(),
            name: format!("Test Patient {suffix}"),
            email: format!("patient{suffix}@example.com"),
            password: "TestPass123".to_string(),
            specialization: None,
            hospital: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub status: String,
    pub total_fee: u32,
    pub credential_expires_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialResponse {
    pub credential_id: String,
    pub appointment_id: String,
    pub token: String,
    pub state: String,
    pub issued_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub expires_in: i64,
    pub qr_svg: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateRequest {
    pub token: String,
}

impl ValidateRequest {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub appointment: Option<AppointmentResponse>,
}

#[derive(Debug, Serialize)]
pub struct CreateReportRequest {
    pub token: String,
    pub diagnosis: String,
    pub prescription: String,
    pub use_letterhead: bool,
}

impl CreateReportRequest {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            diagnosis: "Stable angina".to_string(),
            prescription: "Aspirin 75mg daily".to_string(),
            use_letterhead: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub id: String,
    pub appointment_id: Option<String>,
    pub patient_id: String,
    pub doctor_id: String,
    pub hospital_name: String,
    pub letterhead: Option<serde_json::Value>,
}
