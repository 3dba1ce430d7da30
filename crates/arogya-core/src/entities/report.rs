//! Medical report entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AppointmentId, ReportId, UserId};

/// Hospital letterhead printed on a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letterhead {
    pub hospital_name: String,
    pub address: String,
    pub contact_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// Medical report written by a doctor for a patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalReport {
    pub id: ReportId,
    /// Appointment the report was written for; seeded history may lack one
    pub appointment_id: Option<AppointmentId>,
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub hospital_name: String,
    pub diagnosis: String,
    pub prescription: String,
    pub notes: Option<String>,
    pub letterhead: Option<Letterhead>,
    pub created_at: DateTime<Utc>,
}
