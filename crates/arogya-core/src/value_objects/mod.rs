//! Value objects - immutable types that represent domain concepts

mod ids;
mod permissions;
mod role;
mod token;

pub use ids::{AppointmentId, IdParseError, ReportId, SubjectId, UserId};
pub use permissions::Permissions;
pub use role::Role;
pub use token::CredentialToken;
