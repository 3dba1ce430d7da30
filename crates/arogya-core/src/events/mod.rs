//! Domain events

mod domain_event;

pub use domain_event::{
    CredentialConsumedEvent, CredentialExpiredEvent, CredentialIssuedEvent,
    CredentialRevokedEvent, CredentialSupersededEvent, DomainEvent, ReportCreatedEvent,
};
