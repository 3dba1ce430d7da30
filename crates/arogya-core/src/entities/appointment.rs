//! Appointment entity - a scheduled visit between a patient and a doctor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AppointmentId, UserId};

/// Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Appointment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Consultation plus report fee in rupees
    pub total_fee: u32,
}

impl Appointment {
    /// Check if the user takes part in this appointment
    pub fn involves(&self, user_id: &UserId) -> bool {
        &self.patient_id == user_id || &self.doctor_id == user_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AppointmentStatus::Cancelled
    }
}
