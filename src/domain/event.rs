//! Invalidation events for the locally-cached view.
//!
//! Every confirmed mutation and every realtime change notification is
//! turned into a [`QueueEvent`] on the [`super::EventBus`]. Events are
//! pure invalidation signals: subscribers re-fetch instead of patching
//! local state from event payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::appointment::AppointmentStatus;
use super::ids::{AppointmentId, BusinessId, EntryId, QueueId};
use super::queue_entry::EntryStatus;

/// Signal that a remotely-owned view may be stale.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QueueEvent {
    /// The entries of a queue changed server-side (realtime notification
    /// or any confirmed local mutation). Payload carries no entry data;
    /// subscribers must re-fetch.
    EntriesInvalidated {
        /// Affected queue.
        queue_id: QueueId,
        /// When the signal was raised client-side.
        timestamp: DateTime<Utc>,
    },

    /// A queue entry transition was confirmed by the server.
    EntryTransitioned {
        /// Affected queue.
        queue_id: QueueId,
        /// Transitioned entry.
        entry_id: EntryId,
        /// Confirmed new status.
        status: EntryStatus,
        /// Confirmation time client-side.
        timestamp: DateTime<Utc>,
    },

    /// An appointment transition was confirmed by the server.
    AppointmentChanged {
        /// Owning business.
        business_id: BusinessId,
        /// Transitioned appointment.
        appointment_id: AppointmentId,
        /// Confirmed new status.
        status: AppointmentStatus,
        /// Confirmation time client-side.
        timestamp: DateTime<Utc>,
    },
}

impl QueueEvent {
    /// The queue this event is scoped to, if any. Appointment events are
    /// not queue-scoped and return `None`.
    #[must_use]
    pub const fn queue_id(&self) -> Option<QueueId> {
        match self {
            Self::EntriesInvalidated { queue_id, .. }
            | Self::EntryTransitioned { queue_id, .. } => Some(*queue_id),
            Self::AppointmentChanged { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EntriesInvalidated { .. } => "entries_invalidated",
            Self::EntryTransitioned { .. } => "entry_transitioned",
            Self::AppointmentChanged { .. } => "appointment_changed",
        }
    }
}
