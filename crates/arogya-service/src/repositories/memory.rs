//! In-memory repositories
//!
//! Stand-ins for the identity provider, appointment book, and report archive.
//! Each is a `DashMap` keyed by id, so they are safe to share across handlers.

use arogya_core::{
    Appointment, AppointmentId, AppointmentRepository, DomainError, MedicalReport, RepoResult,
    ReportId, ReportRepository, User, UserId, UserRepository,
};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<UserId, StoredUser>,
    /// Lowercased email to user id
    emails: DashMap<String, UserId>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> RepoResult<Option<User>> {
        Ok(self.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let Some(id) = self.emails.get(&normalize_email(email)).map(|id| id.clone()) else {
            return Ok(None);
        };
        self.find_by_id(&id).await
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.emails.contains_key(&normalize_email(email)))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        // Claim the email first so two signups cannot both win
        match self.emails.entry(normalize_email(&user.email)) {
            Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
            }
        }

        self.users.insert(
            user.id.clone(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn get_password_hash(&self, id: &UserId) -> RepoResult<Option<String>> {
        Ok(self.users.get(id).map(|stored| stored.password_hash.clone()))
    }
}

// ============================================================================
// Appointments
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    appointments: DashMap<AppointmentId, Appointment>,
}

impl InMemoryAppointmentRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an appointment
    pub fn insert(&self, appointment: Appointment) {
        self.appointments.insert(appointment.id.clone(), appointment);
    }

    fn collect(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let mut found: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_by_id(&self, id: &AppointmentId) -> RepoResult<Option<Appointment>> {
        Ok(self.appointments.get(id).map(|entry| entry.clone()))
    }

    async fn find_by_patient(&self, patient_id: &UserId) -> RepoResult<Vec<Appointment>> {
        Ok(self.collect(|appointment| &appointment.patient_id == patient_id))
    }

    async fn find_by_doctor(&self, doctor_id: &UserId) -> RepoResult<Vec<Appointment>> {
        Ok(self.collect(|appointment| &appointment.doctor_id == doctor_id))
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Default)]
pub struct InMemoryReportRepository {
    reports: DashMap<ReportId, MedicalReport>,
}

impl InMemoryReportRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn collect(&self, keep: impl Fn(&MedicalReport) -> bool) -> Vec<MedicalReport> {
        let mut found: Vec<MedicalReport> = self
            .reports
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn find_by_id(&self, id: &ReportId) -> RepoResult<Option<MedicalReport>> {
        Ok(self.reports.get(id).map(|entry| entry.clone()))
    }

    async fn find_by_patient(&self, patient_id: &UserId) -> RepoResult<Vec<MedicalReport>> {
        Ok(self.collect(|report| &report.patient_id == patient_id))
    }

    async fn find_by_doctor(&self, doctor_id: &UserId) -> RepoResult<Vec<MedicalReport>> {
        Ok(self.collect(|report| &report.doctor_id == doctor_id))
    }

    async fn create(&self, report: &MedicalReport) -> RepoResult<()> {
        match self.reports.entry(report.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::ValidationError(format!(
                "report {} already exists",
                report.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(report.clone());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arogya_core::AppointmentStatus;
    use chrono::{Duration, Utc};

    fn user(id: &str, email: &str) -> User {
        User::patient(UserId::parse(id).unwrap(), "Test".to_string(), email.to_string())
    }

    #[tokio::test]
    async fn test_user_lookup_by_email_ignores_case() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("p9", "Someone@Example.com"), "hash").await.unwrap();

        let found = repo.find_by_email("someone@example.com").await.unwrap().unwrap();
        assert_eq!(found.id.as_str(), "p9");
        assert!(repo.email_exists(" SOMEONE@example.com ").await.unwrap());
        assert_eq!(
            repo.get_password_hash(&found.id).await.unwrap().as_deref(),
            Some("hash")
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("p8", "dup@example.com"), "hash").await.unwrap();

        let result = repo.create(&user("p9", "DUP@example.com"), "hash").await;
        assert!(matches!(result, Err(DomainError::EmailAlreadyExists)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_appointments_sorted_soonest_first() {
        let repo = InMemoryAppointmentRepository::new();
        let now = Utc::now();
        for (id, offset) in [("a3", 3), ("a1", 1), ("a2", 2)] {
            repo.insert(Appointment {
                id: AppointmentId::parse(id).unwrap(),
                patient_id: UserId::parse("p1").unwrap(),
                doctor_id: UserId::parse("d1").unwrap(),
                scheduled_at: now + Duration::days(offset),
                status: AppointmentStatus::Scheduled,
                total_fee: 100,
            });
        }

        let ids: Vec<String> = repo
            .find_by_patient(&UserId::parse("p1").unwrap())
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id.to_string())
            .collect();
        assert_eq!(ids, ["a1", "a2", "a3"]);
        assert!(repo
            .find_by_doctor(&UserId::parse("d2").unwrap())
            .await
            .unwrap()
            .is_empty());
    }
}
