//! Ports the domain depends on

mod clock;
mod repositories;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use repositories::{AppointmentRepository, RepoResult, ReportRepository, UserRepository};
