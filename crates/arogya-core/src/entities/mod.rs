//! Domain entities - core business objects

mod appointment;
mod credential;
mod report;
mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use credential::{Credential, CredentialState, DEFAULT_VALIDITY_WINDOW_SECS};
pub use report::{Letterhead, MedicalReport};
pub use user::{DoctorProfile, User};
