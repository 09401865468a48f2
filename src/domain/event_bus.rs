//! Broadcast channel for invalidation events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Confirmed
//! mutations and realtime notifications publish a [`QueueEvent`] through
//! the bus; pollers subscribe and treat matching events as re-fetch
//! triggers.

use tokio::sync::broadcast;

use super::QueueEvent;

/// Broadcast bus for [`QueueEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for
/// lagging receivers; since events are pure invalidation signals, a
/// lagging receiver recovers by simply re-fetching once.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: QueueEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future events.
    ///
    /// Each poller should call this once when it is spawned.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
