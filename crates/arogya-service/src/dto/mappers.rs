//! Entity to DTO mappers

use arogya_core::{Appointment, DoctorProfile, MedicalReport, User};

use super::responses::{
    AppointmentResponse, CurrentUserResponse, DoctorProfileResponse, ReportResponse,
};

impl From<&DoctorProfile> for DoctorProfileResponse {
    fn from(profile: &DoctorProfile) -> Self {
        Self {
            specialization: profile.specialization.clone(),
            hospital: profile.hospital.clone(),
            consultation_fee: profile.consultation_fee,
            report_fee: profile.report_fee,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            doctor_profile: user.doctor_profile.as_ref().map(DoctorProfileResponse::from),
            created_at: user.created_at,
        }
    }
}

impl From<&Appointment> for AppointmentResponse {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.to_string(),
            patient_id: appointment.patient_id.to_string(),
            doctor_id: appointment.doctor_id.to_string(),
            scheduled_at: appointment.scheduled_at,
            status: appointment.status,
            total_fee: appointment.total_fee,
            credential_expires_at: None,
        }
    }
}

impl From<&MedicalReport> for ReportResponse {
    fn from(report: &MedicalReport) -> Self {
        Self {
            id: report.id.to_string(),
            appointment_id: report.appointment_id.as_ref().map(ToString::to_string),
            patient_id: report.patient_id.to_string(),
            doctor_id: report.doctor_id.to_string(),
            hospital_name: report.hospital_name.clone(),
            diagnosis: report.diagnosis.clone(),
            prescription: report.prescription.clone(),
            notes: report.notes.clone(),
            letterhead: report.letterhead.clone(),
            created_at: report.created_at,
        }
    }
}

impl From<MedicalReport> for ReportResponse {
    fn from(report: MedicalReport) -> Self {
        Self::from(&report)
    }
}
