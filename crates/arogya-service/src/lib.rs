//! # arogya-service
//!
//! Application layer: the ephemeral credential engine, capability checks,
//! in-memory directory, and the use cases the HTTP layer calls into.

pub mod authorization;
pub mod credentials;
pub mod dto;
pub mod events;
pub mod qr;
pub mod repositories;
pub mod services;

pub use authorization::{Authorizer, IssueCapability, Principal, ReportCapability, ValidateCapability};
pub use credentials::{CredentialStore, CredentialStoreConfig, RuntimeClock};
pub use events::EventPublisher;
pub use services::{
    AppointmentService, AuthService, CredentialService, ReportService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
