//! Repository traits (ports) - define the interface for data access
//!
//! The portal's identity provider and appointment book are external systems.
//! The domain layer defines what it needs from them, and the infrastructure
//! layer provides the implementation.

use async_trait::async_trait;

use crate::entities::{Appointment, MedicalReport, User};
use crate::error::DomainError;
use crate::value_objects::{AppointmentId, ReportId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: &UserId) -> RepoResult<Option<User>>;

    /// Find user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: &UserId) -> RepoResult<Option<String>>;
}

// ============================================================================
// Appointment Repository
// ============================================================================

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Find appointment by ID
    async fn find_by_id(&self, id: &AppointmentId) -> RepoResult<Option<Appointment>>;

    /// List appointments booked by a patient, soonest first
    async fn find_by_patient(&self, patient_id: &UserId) -> RepoResult<Vec<Appointment>>;

    /// List appointments with a doctor, soonest first
    async fn find_by_doctor(&self, doctor_id: &UserId) -> RepoResult<Vec<Appointment>>;
}

// ============================================================================
// Report Repository
// ============================================================================

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Find report by ID
    async fn find_by_id(&self, id: &ReportId) -> RepoResult<Option<MedicalReport>>;

    /// List reports written for a patient, newest first
    async fn find_by_patient(&self, patient_id: &UserId) -> RepoResult<Vec<MedicalReport>>;

    /// List reports written by a doctor, newest first
    async fn find_by_doctor(&self, doctor_id: &UserId) -> RepoResult<Vec<MedicalReport>>;

    /// Store a new report
    async fn create(&self, report: &MedicalReport) -> RepoResult<()>;
}
