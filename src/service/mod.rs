//! Coordination layer between the wire and the local view.
//!
//! Services own the "call API → apply confirmed result → emit event"
//! pattern for every operation; nothing else in the crate mutates local
//! state.

pub mod appointment_service;
pub mod queue_service;

pub use appointment_service::AppointmentService;
pub use queue_service::QueueService;
