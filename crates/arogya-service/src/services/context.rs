//! Service context - dependency container for services

use std::sync::Arc;

use arogya_common::auth::JwtService;
use arogya_core::traits::{AppointmentRepository, ReportRepository, UserRepository};
use arogya_core::{SharedClock, SystemClock};

use crate::authorization::Authorizer;
use crate::credentials::{CredentialStore, CredentialStoreConfig};
use crate::events::EventPublisher;

use super::error::{ServiceError, ServiceResult};

/// Everything a service needs, shared across requests
///
/// Repositories are trait objects so the in-memory directory can be swapped
/// for a real identity provider or appointment book.
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    appointment_repo: Arc<dyn AppointmentRepository>,
    report_repo: Arc<dyn ReportRepository>,

    credentials: CredentialStore,
    events: EventPublisher,
    authorizer: Authorizer,

    jwt_service: Arc<JwtService>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn appointment_repo(&self) -> &dyn AppointmentRepository {
        self.appointment_repo.as_ref()
    }

    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    // === Credentials ===

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Domain event fan-out shared with the credential store
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    // === Auth ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("credentials", &self.credentials)
            .field("jwt_service", &self.jwt_service)
            .finish()
    }
}

/// Builder for [`ServiceContext`]
///
/// Repositories and the JWT service are required. The clock defaults to the
/// system clock and the credential store to a 10-minute repeat-use window.
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    appointment_repo: Option<Arc<dyn AppointmentRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    clock: Option<SharedClock>,
    credential_config: CredentialStoreConfig,
    event_capacity: Option<usize>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn appointment_repo(mut self, repo: Arc<dyn AppointmentRepository>) -> Self {
        self.appointment_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn credential_config(mut self, config: CredentialStoreConfig) -> Self {
        self.credential_config = config;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let events = self
            .event_capacity
            .map_or_else(EventPublisher::default, EventPublisher::new);
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let credentials = CredentialStore::new(clock, events.clone(), self.credential_config);

        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            appointment_repo: self
                .appointment_repo
                .ok_or_else(|| ServiceError::validation("appointment_repo is required"))?,
            report_repo: self
                .report_repo
                .ok_or_else(|| ServiceError::validation("report_repo is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            credentials,
            events,
            authorizer: Authorizer,
        })
    }
}
