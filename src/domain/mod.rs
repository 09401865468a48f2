//! Domain layer: core types, lifecycle state machines, and event system.
//!
//! This module contains the client-side domain model: typed identifiers,
//! queue and appointment records with their status lifecycles, and the
//! event bus used to broadcast invalidation signals.

pub mod appointment;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod queue;
pub mod queue_entry;

pub use appointment::{Appointment, AppointmentAction, AppointmentStatus};
pub use event::QueueEvent;
pub use event_bus::EventBus;
pub use ids::{AppointmentId, BusinessId, EntryId, QueueId, ServiceId};
pub use queue::{Business, Queue, QueueStatus, Service};
pub use queue_entry::{EntryStatus, QueueEntry};
