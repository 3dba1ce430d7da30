//! Demo directory: three doctors, two patients, their appointments and
//! report history. Every seeded account logs in with [`DEMO_PASSWORD`].

use arogya_common::hash_password;
use arogya_core::{
    Appointment, AppointmentId, AppointmentStatus, DoctorProfile, Letterhead, MedicalReport,
    ReportId, ReportRepository, User, UserId, UserRepository,
};
use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use super::memory::{InMemoryAppointmentRepository, InMemoryReportRepository, InMemoryUserRepository};
use crate::services::error::{ServiceError, ServiceResult};

pub const DEMO_PASSWORD: &str = "Password123";

fn id<T: std::str::FromStr>(raw: &str) -> ServiceResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| ServiceError::internal(format!("bad seed id {raw}: {e}")))
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> ServiceResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .ok_or_else(|| ServiceError::internal("bad seed timestamp"))
}

fn doctor(
    raw_id: &str,
    name: &str,
    email: &str,
    specialization: &str,
    hospital: &str,
    fees: (u32, u32),
    joined: DateTime<Utc>,
) -> ServiceResult<User> {
    let mut user = User::doctor(
        id(raw_id)?,
        name.to_string(),
        email.to_string(),
        DoctorProfile {
            specialization: specialization.to_string(),
            hospital: Some(hospital.to_string()),
            consultation_fee: fees.0,
            report_fee: fees.1,
        },
    );
    user.created_at = joined;
    Ok(user)
}

fn patient(raw_id: &str, name: &str, email: &str, joined: DateTime<Utc>) -> ServiceResult<User> {
    let mut user = User::patient(id(raw_id)?, name.to_string(), email.to_string());
    user.created_at = joined;
    Ok(user)
}

/// Load the demo directory into empty repositories
///
/// # Errors
/// Fails if password hashing fails or a seeded email is already taken
pub async fn seed_demo_data(
    users: &InMemoryUserRepository,
    appointments: &InMemoryAppointmentRepository,
    reports: &InMemoryReportRepository,
) -> ServiceResult<()> {
    // One hash for every demo account
    let password_hash = hash_password(DEMO_PASSWORD)?;

    let people = [
        doctor(
            "d1",
            "Dr. Rajiv Sharma",
            "rajiv.sharma@arogyamitra.com",
            "Cardiologist",
            "Arogya City Hospital",
            (800, 50),
            at(2022, 1, 15, 0, 0)?,
        )?,
        doctor(
            "d2",
            "Dr. Priya Patel",
            "priya.patel@arogyamitra.com",
            "Pediatrician",
            "Child Care Center",
            (600, 50),
            at(2022, 3, 10, 0, 0)?,
        )?,
        doctor(
            "d3",
            "Dr. Anand Gupta",
            "anand.gupta@arogyamitra.com",
            "Neurologist",
            "Neuro Sciences Institute",
            (1200, 100),
            at(2021, 11, 5, 0, 0)?,
        )?,
        patient("p1", "Aarav Singh", "aarav@example.com", at(2022, 5, 20, 0, 0)?)?,
        patient("p2", "Meera Desai", "meera@example.com", at(2022, 7, 12, 0, 0)?)?,
    ];
    for user in &people {
        users.create(user, &password_hash).await?;
    }

    appointments.insert(Appointment {
        id: id::<AppointmentId>("a1")?,
        patient_id: id("p1")?,
        doctor_id: id("d1")?,
        scheduled_at: at(2023, 5, 25, 10, 30)?,
        status: AppointmentStatus::Completed,
        total_fee: 850,
    });
    appointments.insert(Appointment {
        id: id::<AppointmentId>("a2")?,
        patient_id: id("p2")?,
        doctor_id: id("d2")?,
        scheduled_at: at(2023, 5, 30, 15, 0)?,
        status: AppointmentStatus::Scheduled,
        total_fee: 650,
    });

    let history = [
        MedicalReport {
            id: id::<ReportId>("r1")?,
            appointment_id: None,
            patient_id: id::<UserId>("p1")?,
            doctor_id: id::<UserId>("d1")?,
            hospital_name: "Arogya City Hospital".to_string(),
            diagnosis: "Hypertension Stage 1".to_string(),
            prescription: "Amlodipine 5mg once daily, low sodium diet".to_string(),
            notes: Some("Follow up in 2 weeks. Monitor BP daily.".to_string()),
            letterhead: Some(Letterhead {
                hospital_name: "Arogya City Hospital".to_string(),
                address: "123 Health Avenue, Mumbai, 400001".to_string(),
                contact_info: "Tel: +91 22 12345678, Email: info@arogyacityhospital.com".to_string(),
                footer: None,
            }),
            created_at: at(2023, 1, 10, 0, 0)?,
        },
        MedicalReport {
            id: id::<ReportId>("r2")?,
            appointment_id: None,
            patient_id: id::<UserId>("p1")?,
            doctor_id: id::<UserId>("d3")?,
            hospital_name: "Neuro Sciences Institute".to_string(),
            diagnosis: "Tension headache".to_string(),
            prescription: "Ibuprofen 400mg as needed, stress management techniques".to_string(),
            notes: Some("MRI scan negative for pathological findings.".to_string()),
            letterhead: Some(Letterhead {
                hospital_name: "Neuro Sciences Institute".to_string(),
                address: "45 Brain Street, Delhi, 110001".to_string(),
                contact_info: "Tel: +91 11 87654321, Email: info@neuroinstitute.com".to_string(),
                footer: None,
            }),
            created_at: at(2023, 2, 15, 0, 0)?,
        },
    ];
    for report in &history {
        reports.create(report).await?;
    }

    info!(
        users = people.len(),
        appointments = 2,
        reports = history.len(),
        "Demo data seeded"
    );
    Ok(())
}
