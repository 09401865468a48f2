//! External API layer: typed wire schemas and the HTTP client.
//!
//! The server is the source of truth for every entity; this layer is the
//! only place requests are built and payloads are validated.

pub mod client;
pub mod schemas;

pub use client::{ApiClient, QueueTransport};
