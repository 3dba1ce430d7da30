//! Domain events - events emitted when domain state changes
//!
//! These events are used for:
//! - Notifying the issuing patient that a displayed code is no longer usable
//! - Audit logging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{AppointmentId, ReportId, SubjectId, UserId};

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Credential Events
    // =========================================================================
    CredentialIssued(CredentialIssuedEvent),
    CredentialSuperseded(CredentialSupersededEvent),
    CredentialExpired(CredentialExpiredEvent),
    CredentialRevoked(CredentialRevokedEvent),
    CredentialConsumed(CredentialConsumedEvent),

    // =========================================================================
    // Report Events
    // =========================================================================
    ReportCreated(ReportCreatedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CredentialIssued(_) => "CREDENTIAL_ISSUED",
            Self::CredentialSuperseded(_) => "CREDENTIAL_SUPERSEDED",
            Self::CredentialExpired(_) => "CREDENTIAL_EXPIRED",
            Self::CredentialRevoked(_) => "CREDENTIAL_REVOKED",
            Self::CredentialConsumed(_) => "CREDENTIAL_CONSUMED",
            Self::ReportCreated(_) => "REPORT_CREATED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::CredentialIssued(e) => e.timestamp,
            Self::CredentialSuperseded(e) => e.timestamp,
            Self::CredentialExpired(e) => e.timestamp,
            Self::CredentialRevoked(e) => e.timestamp,
            Self::CredentialConsumed(e) => e.timestamp,
            Self::ReportCreated(e) => e.timestamp,
        }
    }

    /// Subject the event concerns, for credential events
    pub fn subject_id(&self) -> Option<&SubjectId> {
        match self {
            Self::CredentialIssued(e) => Some(&e.subject_id),
            Self::CredentialSuperseded(e) => Some(&e.subject_id),
            Self::CredentialExpired(e) => Some(&e.subject_id),
            Self::CredentialRevoked(e) => Some(&e.subject_id),
            Self::CredentialConsumed(e) => Some(&e.subject_id),
            Self::ReportCreated(_) => None,
        }
    }

    /// Credential the event concerns, for credential events
    pub fn credential_id(&self) -> Option<Uuid> {
        match self {
            Self::CredentialIssued(e) => Some(e.credential_id),
            Self::CredentialSuperseded(e) => Some(e.credential_id),
            Self::CredentialExpired(e) => Some(e.credential_id),
            Self::CredentialRevoked(e) => Some(e.credential_id),
            Self::CredentialConsumed(e) => Some(e.credential_id),
            Self::ReportCreated(_) => None,
        }
    }

    /// Whether this event ends the usability of a credential
    pub fn ends_credential(&self) -> bool {
        matches!(
            self,
            Self::CredentialSuperseded(_)
                | Self::CredentialExpired(_)
                | Self::CredentialRevoked(_)
                | Self::CredentialConsumed(_)
        )
    }
}

// =============================================================================
// Credential Event Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialIssuedEvent {
    pub credential_id: Uuid,
    pub subject_id: SubjectId,
    pub issued_by: UserId,
    pub expires_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSupersededEvent {
    pub credential_id: Uuid,
    pub subject_id: SubjectId,
    /// Credential that took over the subject's slot
    pub replaced_by: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialExpiredEvent {
    pub credential_id: Uuid,
    pub subject_id: SubjectId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRevokedEvent {
    pub credential_id: Uuid,
    pub subject_id: SubjectId,
    pub revoked_by: UserId,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialConsumedEvent {
    pub credential_id: Uuid,
    pub subject_id: SubjectId,
    pub consumed_by: UserId,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Report Event Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCreatedEvent {
    pub report_id: ReportId,
    pub appointment_id: AppointmentId,
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub timestamp: DateTime<Utc>,
}
