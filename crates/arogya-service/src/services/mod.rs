//! Portal use cases
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request and does its own authorization through the context's authorizer.

pub mod appointment;
pub mod auth;
pub mod context;
pub mod credential;
pub mod error;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

pub use appointment::AppointmentService;
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use credential::CredentialService;
pub use error::{ServiceError, ServiceResult};
pub use report::ReportService;
