//! Repository implementations

mod memory;
mod seed;

pub use memory::{InMemoryAppointmentRepository, InMemoryReportRepository, InMemoryUserRepository};
pub use seed::{seed_demo_data, DEMO_PASSWORD};
