//! In-process event fan-out
//!
//! Domain events are broadcast to every live subscriber. A subscriber that
//! falls more than `capacity` events behind skips ahead and sees `Lagged`.

use arogya_core::DomainEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Cloneable handle for publishing and subscribing to domain events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event, returning how many subscribers received it
    pub fn publish(&self, event: DomainEvent) -> usize {
        let event_type = event.event_type();
        // No subscribers is the normal idle state
        let delivered = self.tx.send(event).unwrap_or(0);
        trace!(event_type, delivered, "Event published");
        delivered
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}
