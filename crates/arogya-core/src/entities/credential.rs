//! Credential entity - a time-limited access token bound to one subject

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::value_objects::{CredentialToken, SubjectId, UserId};

/// Default validity window: 10 minutes
pub const DEFAULT_VALIDITY_WINDOW_SECS: i64 = 600;

/// Lifecycle state of a credential, derived from the clock and the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialState {
    /// Current for its subject and inside its validity window
    Active,
    /// Validity window has elapsed
    Expired,
    /// No longer current: superseded, revoked, or consumed
    Replaced,
}

/// An issued credential
///
/// `expires_at` is fixed at issuance; nothing in the crate offers a way to
/// extend it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: Uuid,
    pub subject_id: SubjectId,
    pub token: CredentialToken,
    pub issued_by: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Issue a new credential with a fresh random token
    pub fn issue(
        subject_id: SubjectId,
        issued_by: UserId,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            token: CredentialToken::generate(),
            issued_by,
            issued_at: now,
            expires_at: now + window,
        }
    }

    /// Check if the credential has expired at `now`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check if a presented token matches and the window is still open
    pub fn accepts(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        // Always compare, so timing does not reveal expiry.
        let matches = self.token.matches(candidate);
        matches && !self.is_expired_at(now)
    }

    /// Time left until expiry, clamped at zero
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        let remaining = self.expires_at - now;
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }

    /// Derive the lifecycle state
    ///
    /// `is_current` tells whether the store still holds this credential in its
    /// subject's slot.
    pub fn state_at(&self, now: DateTime<Utc>, is_current: bool) -> CredentialState {
        if self.is_expired_at(now) {
            CredentialState::Expired
        } else if is_current {
            CredentialState::Active
        } else {
            CredentialState::Replaced
        }
    }
}
