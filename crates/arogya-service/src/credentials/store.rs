//! Per-subject credential store
//!
//! Each subject has at most one slot. A slot holds the current credential and
//! the handle of the task that clears it at `expires_at`. A token index maps
//! presented tokens back to their subject; index entries are always
//! re-checked against the slot.
//!
//! Only the final comparison against the slot's token is constant-time. The
//! index lookup hashes the presented string, so an unknown token can be
//! rejected faster than a near miss. Tokens carry 256 random bits, which
//! leaves that difference nothing to guess at.
//!
//! Validation never mutates. In single-use mode a credential is spent by
//! [`CredentialStore::redeem`], which demands a [`ReportCapability`], so only
//! the doctor booked on the appointment can use it up.

use std::sync::{Arc, Weak};

use arogya_core::events::{
    CredentialConsumedEvent, CredentialExpiredEvent, CredentialIssuedEvent,
    CredentialRevokedEvent, CredentialSupersededEvent,
};
use arogya_core::{Credential, CredentialState, DomainEvent, SharedClock, SubjectId, UserId};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::authorization::{IssueCapability, ReportCapability, ValidateCapability};
use crate::events::EventPublisher;

/// Behaviour knobs for the store
#[derive(Debug, Clone, Copy)]
pub struct CredentialStoreConfig {
    /// Time between issuance and expiry
    pub window: chrono::Duration,
    /// Retire a credential once the booked doctor has used it
    pub single_use: bool,
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self {
            window: chrono::Duration::seconds(arogya_core::entities::DEFAULT_VALIDITY_WINDOW_SECS),
            single_use: false,
        }
    }
}

#[derive(Debug)]
struct Slot {
    credential: Credential,
    expiry: JoinHandle<()>,
}

#[derive(Debug)]
struct Inner {
    slots: DashMap<SubjectId, Slot>,
    index: DashMap<String, SubjectId>,
    clock: SharedClock,
    events: EventPublisher,
    config: CredentialStoreConfig,
}

impl Inner {
    /// Clear the slot if it still holds `credential_id`. Returns whether it did.
    fn expire(&self, subject_id: &SubjectId, credential_id: Uuid) -> bool {
        let Some((_, slot)) = self
            .slots
            .remove_if(subject_id, |_, slot| slot.credential.id == credential_id)
        else {
            debug!(%subject_id, %credential_id, "Stale expiry ignored");
            return false;
        };

        self.index.remove(slot.credential.token.as_str());
        info!(%subject_id, %credential_id, "Credential expired");
        self.events.publish(DomainEvent::CredentialExpired(CredentialExpiredEvent {
            credential_id,
            subject_id: subject_id.clone(),
            timestamp: self.clock.now(),
        }));
        true
    }

    /// Drop a slot that has left the store
    fn retire(&self, slot: &Slot) {
        slot.expiry.abort();
        self.index.remove(slot.credential.token.as_str());
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for slot in self.slots.iter() {
            slot.expiry.abort();
        }
    }
}

/// Issues, validates, and expires ephemeral credentials
///
/// Cloning is cheap and every clone shares the same slots. Issuing spawns a
/// task, so it must run inside a tokio runtime.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<Inner>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(clock: SharedClock, events: EventPublisher, config: CredentialStoreConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: DashMap::new(),
                index: DashMap::new(),
                clock,
                events,
                config,
            }),
        }
    }

    pub fn config(&self) -> &CredentialStoreConfig {
        &self.inner.config
    }

    /// Issue a fresh credential for the capability's subject
    ///
    /// Any credential already active for the subject is superseded: its token
    /// stops validating before this returns and its expiry task is cancelled.
    #[instrument(skip(self, capability), fields(subject_id = %capability.subject(), issued_by = %capability.issuer()))]
    pub fn issue(&self, capability: &IssueCapability) -> Credential {
        let inner = &self.inner;
        let now = inner.clock.now();
        let credential = Credential::issue(
            capability.subject().clone(),
            capability.issuer().clone(),
            now,
            inner.config.window,
        );

        let expiry = self.schedule_expiry(&credential);
        inner
            .index
            .insert(credential.token.as_str().to_owned(), credential.subject_id.clone());
        let previous = inner.slots.insert(
            credential.subject_id.clone(),
            Slot {
                credential: credential.clone(),
                expiry,
            },
        );

        if let Some(previous) = previous {
            inner.retire(&previous);
            info!(
                credential_id = %previous.credential.id,
                replaced_by = %credential.id,
                "Credential superseded"
            );
            inner.events.publish(DomainEvent::CredentialSuperseded(CredentialSupersededEvent {
                credential_id: previous.credential.id,
                subject_id: credential.subject_id.clone(),
                replaced_by: credential.id,
                timestamp: now,
            }));
        }

        info!(credential_id = %credential.id, expires_at = %credential.expires_at, "Credential issued");
        inner.events.publish(DomainEvent::CredentialIssued(CredentialIssuedEvent {
            credential_id: credential.id,
            subject_id: credential.subject_id.clone(),
            issued_by: credential.issued_by.clone(),
            expires_at: credential.expires_at,
            timestamp: now,
        }));

        credential
    }

    /// Check a presented token
    ///
    /// True only for the current credential of some subject, before its
    /// expiry. Unknown, expired, superseded, revoked, and redeemed tokens all
    /// yield false.
    pub fn validate(&self, capability: &ValidateCapability, presented: &str) -> bool {
        self.resolve(capability, presented).is_some()
    }

    /// Like [`validate`](Self::validate), returning the confirmed credential
    #[instrument(skip_all, fields(validator = %capability.validator()))]
    pub fn resolve(&self, capability: &ValidateCapability, presented: &str) -> Option<Credential> {
        let inner = &self.inner;
        let now = inner.clock.now();

        let subject_id = inner.index.get(presented).map(|entry| entry.value().clone());
        let Some(subject_id) = subject_id else {
            debug!("Credential rejected: no matching token");
            return None;
        };

        let credential = {
            let slot = inner.slots.get(&subject_id)?;
            if !slot.credential.accepts(presented, now) {
                debug!(%subject_id, "Credential rejected: not current or expired");
                return None;
            }
            slot.credential.clone()
        };

        debug!(%subject_id, credential_id = %credential.id, "Credential accepted");
        Some(credential)
    }

    /// Spend the credential a report capability was granted on
    ///
    /// In single-use mode the credential leaves its slot and `false` means
    /// another use got there first. Otherwise this only confirms the
    /// credential is still the active one.
    #[instrument(skip_all, fields(credential_id = %capability.credential().id))]
    pub fn redeem(&self, capability: &ReportCapability) -> bool {
        let credential = capability.credential();
        if self.inner.config.single_use {
            self.consume(credential, capability.doctor_id())
        } else {
            self.state(credential) == CredentialState::Active
        }
    }

    fn consume(&self, credential: &Credential, consumed_by: &UserId) -> bool {
        let inner = &self.inner;
        let now = inner.clock.now();
        let Some((_, slot)) = inner.slots.remove_if(&credential.subject_id, |_, slot| {
            slot.credential.id == credential.id && !slot.credential.is_expired_at(now)
        }) else {
            return false;
        };

        inner.retire(&slot);
        info!(subject_id = %credential.subject_id, credential_id = %credential.id, "Credential consumed");
        inner.events.publish(DomainEvent::CredentialConsumed(CredentialConsumedEvent {
            credential_id: credential.id,
            subject_id: credential.subject_id.clone(),
            consumed_by: consumed_by.clone(),
            timestamp: now,
        }));
        true
    }

    /// Withdraw the subject's active credential before it expires
    #[instrument(skip(self, capability), fields(subject_id = %capability.subject()))]
    pub fn revoke(&self, capability: &IssueCapability) -> Option<Credential> {
        let inner = &self.inner;
        let (_, slot) = inner.slots.remove(capability.subject())?;
        inner.retire(&slot);

        let credential = slot.credential;
        info!(credential_id = %credential.id, revoked_by = %capability.issuer(), "Credential revoked");
        inner.events.publish(DomainEvent::CredentialRevoked(CredentialRevokedEvent {
            credential_id: credential.id,
            subject_id: credential.subject_id.clone(),
            revoked_by: capability.issuer().clone(),
            timestamp: inner.clock.now(),
        }));
        Some(credential)
    }

    /// Current unexpired credential for a subject
    pub fn active(&self, subject_id: &SubjectId) -> Option<Credential> {
        let now = self.inner.clock.now();
        self.inner
            .slots
            .get(subject_id)
            .filter(|slot| !slot.credential.is_expired_at(now))
            .map(|slot| slot.credential.clone())
    }

    /// Lifecycle state of a credential as of now
    pub fn state(&self, credential: &Credential) -> CredentialState {
        let is_current = self
            .inner
            .slots
            .get(&credential.subject_id)
            .is_some_and(|slot| slot.credential.id == credential.id);
        credential.state_at(self.inner.clock.now(), is_current)
    }

    /// Number of subjects holding an unexpired credential
    pub fn active_count(&self) -> usize {
        let now = self.inner.clock.now();
        self.inner
            .slots
            .iter()
            .filter(|slot| !slot.credential.is_expired_at(now))
            .count()
    }

    /// Receive credential lifecycle notifications
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.inner.events.subscribe()
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.inner.clock.now()
    }

    fn schedule_expiry(&self, credential: &Credential) -> JoinHandle<()> {
        let store: Weak<Inner> = Arc::downgrade(&self.inner);
        let subject_id = credential.subject_id.clone();
        let credential_id = credential.id;
        let expires_at = credential.expires_at;

        tokio::spawn(async move {
            // Sleep until the store's clock agrees the window has closed
            loop {
                let Some(inner) = store.upgrade() else { return };
                let remaining = expires_at - inner.clock.now();
                drop(inner);

                match remaining.to_std() {
                    Ok(wait) if !wait.is_zero() => tokio::time::sleep(wait).await,
                    _ => break,
                }
            }

            if let Some(inner) = store.upgrade() {
                inner.expire(&subject_id, credential_id);
            }
        })
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("slots", &self.inner.slots.len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
