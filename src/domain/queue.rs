//! Queue, business, and service records.
//!
//! These are simple profile/config records owned by the server. The
//! client mutates them only through explicit management calls and never
//! derives state from them beyond the join guard on [`QueueStatus`].

use serde::{Deserialize, Serialize};

use super::ids::{BusinessId, QueueId, ServiceId};

/// Intake status of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Accepting new entries.
    Open,
    /// Not accepting entries; existing entries are still serviced.
    Closed,
    /// Temporarily suspended.
    Paused,
}

impl QueueStatus {
    /// Returns `true` if customers may join the queue right now.
    #[must_use]
    pub const fn is_joinable(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// A named intake channel owned by a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    /// Queue identifier.
    pub id: QueueId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Current intake status.
    pub status: QueueStatus,
    /// Per-person wait estimate in minutes. A configured multiplier,
    /// not a measured value.
    #[serde(default)]
    pub current_wait_time_minutes: u32,
}

impl Queue {
    /// Estimated total wait in minutes for a customer joining behind
    /// `waiting_count` people.
    #[must_use]
    pub const fn estimated_wait_minutes(&self, waiting_count: u32) -> u32 {
        waiting_count.saturating_mul(self.current_wait_time_minutes)
    }
}

/// A business profile record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    /// Business identifier.
    pub id: BusinessId,
    /// Display name, interpolated into customer-facing messages.
    pub name: String,
    /// URL slug for the public join and display pages.
    pub slug: String,
    /// Optional street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Optional contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A bookable service offered by a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Nominal duration in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Listed price, if published.
    #[serde(default)]
    pub price: Option<f64>,
}
