//! # queueup-client
//!
//! Client-side state engine for the QueueUp walk-in queue and
//! appointment service. The crate keeps a local view of one business's
//! queues and appointments synchronized against the QueueUp HTTP API —
//! the server is the single source of truth, and every local mutation
//! is gated on a confirmed server response.
//!
//! ## Architecture
//!
//! ```text
//! QueueUp API (HTTP, WebSocket)
//!     │
//!     ├── ApiClient / QueueTransport (api/)
//!     ├── RealtimeListener (realtime)
//!     │
//!     ├── QueueService, AppointmentService (service/)
//!     ├── StatusPoller (poller)
//!     ├── EventBus (domain/)
//!     │
//!     ├── QueueEntryStore (store)
//!     └── Formatting helpers (format)
//! ```
//!
//! Views subscribe to the [`domain::EventBus`] and re-read the
//! [`store::QueueEntryStore`] snapshot when an event fires; they never
//! receive entry data through events themselves.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod poller;
pub mod realtime;
pub mod service;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
