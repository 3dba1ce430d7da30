//! Shared setup for service tests

use std::sync::Arc;

use arogya_common::auth::JwtService;
use arogya_core::{Role, SharedClock, UserId};

use crate::authorization::Principal;
use crate::credentials::CredentialStoreConfig;
use crate::repositories::{
    seed_demo_data, InMemoryAppointmentRepository, InMemoryReportRepository, InMemoryUserRepository,
};

use super::context::ServiceContext;

pub(crate) async fn seeded_context() -> ServiceContext {
    build(None, CredentialStoreConfig::default()).await
}

pub(crate) async fn seeded_context_with(clock: SharedClock, config: CredentialStoreConfig) -> ServiceContext {
    build(Some(clock), config).await
}

async fn build(clock: Option<SharedClock>, config: CredentialStoreConfig) -> ServiceContext {
    let users = Arc::new(InMemoryUserRepository::new());
    let appointments = Arc::new(InMemoryAppointmentRepository::new());
    let reports = Arc::new(InMemoryReportRepository::new());
    seed_demo_data(&users, &appointments, &reports).await.unwrap();

    let mut builder = ServiceContext::builder()
        .user_repo(users)
        .appointment_repo(appointments)
        .report_repo(reports)
        .jwt_service(Arc::new(JwtService::new(
            "test-secret-key-that-is-long-enough",
            900,
            604_800,
        )))
        .credential_config(config);
    if let Some(clock) = clock {
        builder = builder.clock(clock);
    }
    builder.build().unwrap()
}

pub(crate) fn patient(id: &str) -> Principal {
    Principal::new(UserId::parse(id).unwrap(), Role::Patient)
}

pub(crate) fn doctor(id: &str) -> Principal {
    Principal::new(UserId::parse(id).unwrap(), Role::Doctor)
}
