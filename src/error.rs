//! Client error types with API status classification.
//!
//! [`ClientError`] is the central error type for the client core. The
//! taxonomy follows three tiers: authorization failures are fatal to the
//! session, mutation failures are recoverable in place, and transport
//! failures during polling are logged and retried on the next tick.

use crate::domain::appointment::AppointmentStatus;
use crate::domain::ids::{AppointmentId, EntryId, QueueId};

/// Central error enum for all client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the credentials (HTTP 401). The session has
    /// already been torn down by the HTTP layer; callers must not retry.
    #[error("unauthorized: session has been invalidated")]
    Unauthorized,

    /// The API returned a non-success status other than 401.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// Network or protocol failure before a response was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// An appointment transition not permitted by the lifecycle.
    #[error("invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Status the appointment currently holds.
        from: AppointmentStatus,
        /// Status the caller attempted to move to.
        to: AppointmentStatus,
    },

    /// Joining was attempted on a queue that is not open.
    #[error("queue {0} is not accepting entries")]
    QueueClosed(QueueId),

    /// No queue entry with the given ID in the local snapshot.
    #[error("queue entry not found: {0}")]
    EntryNotFound(EntryId),

    /// No appointment with the given ID in the local cache.
    #[error("appointment not found: {0}")]
    AppointmentNotFound(AppointmentId),

    /// Failure on the realtime change-notification channel.
    #[error("realtime channel error: {0}")]
    Realtime(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Classifies an HTTP status code plus server message into an error.
    ///
    /// `401` maps to [`ClientError::Unauthorized`]; everything else becomes
    /// [`ClientError::Api`].
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 401 {
            Self::Unauthorized
        } else {
            Self::Api { status, message }
        }
    }

    /// Returns `true` if the error ends the session and must not be
    /// retried by pollers.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
