//! Appointment coordination: cached business appointments and
//! lifecycle-validated, gated status updates.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::api::QueueTransport;
use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::ids::AppointmentId;
use crate::domain::{EventBus, QueueEvent};
use crate::error::ClientError;

#[derive(Debug, Default)]
struct AppointmentCache {
    appointments: Vec<Appointment>,
    /// Sequence of the fetch that produced this cache.
    seq: u64,
}

/// Coordination layer for the business's appointments.
///
/// Holds a local cache of the business's appointments, refreshed
/// wholesale like the queue snapshot and guarded by the same monotonic
/// fetch sequence, so a slow refresh response cannot overwrite a
/// fresher one. Status updates are validated against the lifecycle
/// table client-side before the server is asked, and the cache is
/// touched only after a confirmed success.
#[derive(Debug)]
pub struct AppointmentService<T> {
    transport: Arc<T>,
    cache: RwLock<AppointmentCache>,
    issued: AtomicU64,
    event_bus: EventBus,
}

impl<T: QueueTransport> AppointmentService<T> {
    /// Creates a service with an empty cache.
    #[must_use]
    pub fn new(transport: Arc<T>, event_bus: EventBus) -> Self {
        Self {
            transport,
            cache: RwLock::new(AppointmentCache::default()),
            issued: AtomicU64::new(0),
            event_bus,
        }
    }

    /// Fetches the business's appointments and replaces the cache.
    ///
    /// A response that lost the race against a later-issued refresh is
    /// discarded; the fresher cache's size is returned in that case.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        let seq = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        let fetched = self.transport.business_appointments().await?;
        let mut cache = self.cache.write().await;
        if seq < cache.seq {
            tracing::debug!(seq, installed = cache.seq, "discarding stale appointment fetch");
            return Ok(cache.appointments.len());
        }
        let count = fetched.len();
        cache.appointments = fetched;
        cache.seq = seq;
        tracing::debug!(count, "appointments refreshed");
        Ok(count)
    }

    /// All cached appointments, in server order.
    pub async fn all(&self) -> Vec<Appointment> {
        self.cache.read().await.appointments.clone()
    }

    /// Looks up a cached appointment by ID.
    pub async fn appointment(&self, id: AppointmentId) -> Option<Appointment> {
        self.cache
            .read()
            .await
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Transitions an appointment to `next`.
    ///
    /// The move is validated against the lifecycle first; an illegal edge
    /// never reaches the server. On confirmed success the cache is
    /// updated with the server's copy and an invalidation event is
    /// published. On failure the attempted status is discarded and the
    /// displayed status remains unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AppointmentNotFound`] for an unknown ID,
    /// [`ClientError::InvalidTransition`] for an illegal edge, or a
    /// [`ClientError`] from the API call.
    pub async fn update_status(
        &self,
        id: AppointmentId,
        next: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        let current = self
            .appointment(id)
            .await
            .ok_or(ClientError::AppointmentNotFound(id))?;
        if !current.status.can_transition(next) {
            return Err(ClientError::InvalidTransition {
                from: current.status,
                to: next,
            });
        }

        let updated = self.transport.update_appointment_status(id, next).await?;

        let mut cache = self.cache.write().await;
        if let Some(slot) = cache.appointments.iter_mut().find(|a| a.id == id) {
            *slot = updated.clone();
        }
        drop(cache);

        tracing::info!(appointment_id = %id, status = ?next, "appointment transitioned");
        let _ = self.event_bus.publish(QueueEvent::AppointmentChanged {
            business_id: updated.business_id,
            appointment_id: id,
            status: next,
            timestamp: Utc::now(),
        });
        Ok(updated)
    }
}
