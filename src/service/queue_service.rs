//! Queue coordination: refresh, gated transitions, and the public join
//! and status-lookup paths for one selected queue.

use std::sync::Arc;

use chrono::Utc;

use crate::api::QueueTransport;
use crate::api::schemas::{JoinQueueRequest, PublicQueueStatus};
use crate::domain::ids::{EntryId, QueueId};
use crate::domain::queue::Queue;
use crate::domain::queue_entry::{EntryStatus, QueueEntry};
use crate::domain::{EventBus, QueueEvent};
use crate::error::ClientError;
use crate::store::QueueEntryStore;

/// Coordination layer for one queue's live view.
///
/// Owns the [`QueueEntryStore`] for the selected queue and follows a
/// single pattern for every mutation: call the API → on confirmed
/// success apply the server's copy locally → emit an invalidation event.
/// A failed call changes nothing locally.
#[derive(Debug)]
pub struct QueueService<T> {
    transport: Arc<T>,
    store: Arc<QueueEntryStore>,
    event_bus: EventBus,
    queue_id: QueueId,
}

impl<T: QueueTransport> QueueService<T> {
    /// Creates a service for the given queue with an empty store.
    #[must_use]
    pub fn new(transport: Arc<T>, event_bus: EventBus, queue_id: QueueId) -> Self {
        Self {
            transport,
            store: Arc::new(QueueEntryStore::new()),
            event_bus,
            queue_id,
        }
    }

    /// The queue this service coordinates.
    #[must_use]
    pub const fn queue_id(&self) -> QueueId {
        self.queue_id
    }

    /// The underlying snapshot store, for view projections.
    #[must_use]
    pub fn store(&self) -> &Arc<QueueEntryStore> {
        &self.store
    }

    /// The invalidation bus this service publishes on.
    #[must_use]
    pub const fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Fetches today's entries and replaces the local snapshot wholesale.
    ///
    /// Returns `true` if the snapshot was applied, `false` if it was
    /// discarded as stale (a fresher response landed first).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure. Pollers
    /// treat non-fatal failures as "stale until the next tick".
    pub async fn refresh(&self) -> Result<bool, ClientError> {
        let seq = self.store.next_seq();
        let entries = self.transport.entries_today(self.queue_id).await?;
        let applied = self.store.install(seq, entries).await;
        if applied {
            tracing::debug!(queue_id = %self.queue_id, "snapshot refreshed");
        }
        Ok(applied)
    }

    /// Transitions a queue entry's status.
    ///
    /// Gated mutation: the local snapshot is touched only after the
    /// server confirms, using the server's own updated copy. Entry-level
    /// legality is owned by the server (walk-in statuses have no client
    /// FSM); the client merely relays the requested status.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure; the local
    /// view is unchanged in that case.
    pub async fn transition(
        &self,
        entry_id: EntryId,
        status: EntryStatus,
    ) -> Result<QueueEntry, ClientError> {
        let updated = self.transport.update_entry_status(entry_id, status).await?;
        self.store.apply_confirmed(updated.clone()).await;

        tracing::info!(
            queue_id = %self.queue_id,
            %entry_id,
            status = status.as_str(),
            "queue entry transitioned"
        );
        let _ = self.event_bus.publish(QueueEvent::EntryTransitioned {
            queue_id: self.queue_id,
            entry_id,
            status,
            timestamp: Utc::now(),
        });
        Ok(updated)
    }

    /// Joins the queue on behalf of a customer (public path).
    ///
    /// The caller passes the queue record from the public business page;
    /// joining is refused locally when the queue is not open, so a poll
    /// that observed a closure disables joining before the server is
    /// ever asked.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::QueueClosed`] when the queue does not
    /// accept entries, or a [`ClientError`] from the API call.
    pub async fn join(
        &self,
        queue: &Queue,
        request: &JoinQueueRequest,
    ) -> Result<QueueEntry, ClientError> {
        if !queue.status.is_joinable() {
            return Err(ClientError::QueueClosed(queue.id));
        }
        let entry = self.transport.join_queue(request).await?;
        tracing::info!(
            queue_id = %self.queue_id,
            ticket = %entry.ticket_number,
            position = entry.position,
            "customer joined queue"
        );
        let _ = self.event_bus.publish(QueueEvent::EntriesInvalidated {
            queue_id: self.queue_id,
            timestamp: Utc::now(),
        });
        Ok(entry)
    }

    /// Looks up a customer's own status by opaque token (public path,
    /// no credential attached by the server contract).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn public_status(&self, token: &str) -> Result<PublicQueueStatus, ClientError> {
        self.transport.public_status(token).await
    }

    /// Calls the next waiting entry to the counter.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn advance(&self) -> Result<(), ClientError> {
        self.transport.advance_queue(self.queue_id).await?;
        let _ = self.event_bus.publish(QueueEvent::EntriesInvalidated {
            queue_id: self.queue_id,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Deletes today's entries after explicit staff confirmation.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn reset_today(&self) -> Result<(), ClientError> {
        self.transport.reset_today(self.queue_id).await?;
        self.store.clear().await;
        let _ = self.event_bus.publish(QueueEvent::EntriesInvalidated {
            queue_id: self.queue_id,
            timestamp: Utc::now(),
        });
        tracing::info!(queue_id = %self.queue_id, "today's entries reset");
        Ok(())
    }
}
