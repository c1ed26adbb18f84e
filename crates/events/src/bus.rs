//! Fan-out of [`PlatformEvent`]s over a `tokio::sync::broadcast` channel.
//!
//! Handlers publish after their writes commit. The WebSocket bridge is the
//! main subscriber.

use tokio::sync::broadcast;

use crate::event::PlatformEvent;

/// Events buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Shared as `Arc<EventBus>`. Dropping the last handle closes every
/// subscriber's stream.
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Hand `event` to every current subscriber and return how many there
    /// were. Without subscribers the event is discarded.
    pub fn publish(&self, event: PlatformEvent) -> usize {
        let event_type = event.event_type.clone();
        let reached = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event_type = %event_type, reached, "Event published");
        reached
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
