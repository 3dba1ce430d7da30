//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod appointments;
pub mod auth;
pub mod credentials;
pub mod health;
pub mod reports;
pub mod users;
