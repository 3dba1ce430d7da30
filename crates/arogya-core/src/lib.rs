//! # arogya-core
//!
//! Domain layer containing entities, value objects, ports, and domain events.
//! This crate has zero dependencies on infrastructure (HTTP, storage, runtime).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Appointment, AppointmentStatus, Credential, CredentialState, DoctorProfile, Letterhead,
    MedicalReport, User,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    AppointmentRepository, Clock, ManualClock, RepoResult, ReportRepository, SharedClock,
    SystemClock, UserRepository,
};
pub use value_objects::{
    AppointmentId, CredentialToken, IdParseError, Permissions, ReportId, Role, SubjectId, UserId,
};
