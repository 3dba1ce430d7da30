//! User entity - a patient or doctor account

use chrono::{DateTime, Utc};

use crate::value_objects::{Role, UserId};

/// Practice details shown on a doctor's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorProfile {
    pub specialization: String,
    pub hospital: Option<String>,
    /// Consultation fee in rupees
    pub consultation_fee: u32,
    /// Extra fee charged when a report is written, in rupees
    pub report_fee: u32,
}

/// Portal user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub doctor_profile: Option<DoctorProfile>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new patient
    pub fn patient(id: UserId, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            role: Role::Patient,
            doctor_profile: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new doctor
    pub fn doctor(id: UserId, name: String, email: String, profile: DoctorProfile) -> Self {
        Self {
            id,
            name,
            email,
            role: Role::Doctor,
            doctor_profile: Some(profile),
            created_at: Utc::now(),
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    /// Hospital the doctor practices at, if any
    pub fn hospital(&self) -> Option<&str> {
        self.doctor_profile
            .as_ref()
            .and_then(|profile| profile.hospital.as_deref())
    }
}
