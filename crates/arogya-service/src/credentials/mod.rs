//! Ephemeral credential engine

mod clock;
mod store;

pub use clock::RuntimeClock;
pub use store::{CredentialStore, CredentialStoreConfig};
