//! String identifiers
//!
//! Users, appointments, and reports are keyed by opaque strings (`p1`, `a1`, ...)
//! handed to us by the identity provider and the appointment book. A credential
//! subject is whatever entity a credential grants access to; in this portal that
//! is always an appointment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted identifier length
pub const MAX_ID_LEN: usize = 128;

/// Error when parsing an identifier from user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier exceeds {MAX_ID_LEN} characters")]
    TooLong,
    #[error("identifier contains whitespace or control characters")]
    InvalidCharacters,
}

fn check(raw: &str) -> Result<(), IdParseError> {
    if raw.is_empty() {
        return Err(IdParseError::Empty);
    }
    if raw.len() > MAX_ID_LEN {
        return Err(IdParseError::TooLong);
    }
    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(IdParseError::InvalidCharacters);
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an identifier
            pub fn parse(raw: impl Into<String>) -> Result<Self, IdParseError> {
                let raw = raw.into();
                check(&raw)?;
                Ok(Self(raw))
            }

            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            /// Borrow the identifier as a string slice
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Portal user identifier (patient or doctor)
    UserId
);

string_id!(
    /// Appointment identifier
    AppointmentId
);

string_id!(
    /// Medical report identifier
    ReportId
);

string_id!(
    /// Identifier of the entity a credential grants access to
    SubjectId
);

impl From<AppointmentId> for SubjectId {
    fn from(id: AppointmentId) -> Self {
        Self(id.0)
    }
}

impl From<&AppointmentId> for SubjectId {
    fn from(id: &AppointmentId) -> Self {
        Self(id.0.clone())
    }
}

impl From<&SubjectId> for AppointmentId {
    fn from(id: &SubjectId) -> Self {
        Self(id.0.clone())
    }
}
