//! Runtime-anchored clock

use arogya_core::Clock;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Clock that reads wall time once and then follows tokio's monotonic timer
///
/// Expiry tasks sleep on the same timer, so a credential's slot is cleared at
/// the instant this clock reaches `expires_at`, even when the system clock is
/// adjusted. Under a paused test runtime it moves only with
/// `tokio::time::advance`.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeClock {
    anchor_wall: DateTime<Utc>,
    anchor: Instant,
}

impl RuntimeClock {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Anchor the clock at a given wall time
    #[must_use]
    pub fn starting_at(anchor_wall: DateTime<Utc>) -> Self {
        Self {
            anchor_wall,
            anchor: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.anchor);
        chrono::Duration::from_std(elapsed)
            .map(|elapsed| self.anchor_wall + elapsed)
            .unwrap_or(self.anchor_wall)
    }
}
