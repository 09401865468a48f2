//! Type-safe identifiers for remotely-owned entities.
//!
//! Each identifier is a newtype wrapper around [`uuid::Uuid`] so that a
//! queue ID can never be confused with an entry or appointment ID. All
//! identifiers are minted by the server; the client only parses and
//! round-trips them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4). Used in tests and
            /// for client-generated correlation only; real entity IDs come
            /// from the server.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

entity_id! {
    /// Identifier of a named intake channel (a live queue).
    QueueId
}

entity_id! {
    /// Identifier of one customer's walk-in ticket in a queue.
    EntryId
}

entity_id! {
    /// Identifier of a scheduled appointment.
    AppointmentId
}

entity_id! {
    /// Identifier of a business account.
    BusinessId
}

entity_id! {
    /// Identifier of a bookable service offered by a business.
    ServiceId
}
