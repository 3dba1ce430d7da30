//! Portal roles

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Permissions;

/// Role a portal user signs up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    /// Permissions granted to every user holding this role
    pub fn permissions(self) -> Permissions {
        match self {
            Self::Patient => Permissions::PATIENT,
            Self::Doctor => Permissions::DOCTOR,
        }
    }

    /// Lowercase name as used in tokens and JSON
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
