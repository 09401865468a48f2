//! Walk-in queue entries and their status lifecycle.
//!
//! A [`QueueEntry`] is one customer's ticket in a live queue. `position`
//! is meaningful only while the status is `waiting` and is always
//! server-computed; the client never renumbers positions locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntryId, QueueId};

/// Lifecycle status of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// In line, not yet called.
    Waiting,
    /// Called to the counter.
    Serving,
    /// Arrived and acknowledged on site.
    CheckedIn,
    /// Being attended to.
    InService,
    /// Finished successfully. Terminal.
    Completed,
    /// Withdrawn. Terminal.
    Cancelled,
    /// Called but never appeared. Terminal.
    NoShow,
}

impl EntryStatus {
    /// Returns `true` while the entry still belongs in the rendered
    /// active view.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Returns `true` for statuses shown under the "In Service" section.
    #[must_use]
    pub const fn is_in_service(self) -> bool {
        matches!(self, Self::Serving | Self::CheckedIn | Self::InService)
    }

    /// Wire form of the status, as sent in transition requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Serving => "serving",
            Self::CheckedIn => "checked_in",
            Self::InService => "in_service",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

/// One customer's walk-in ticket in a live queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Entry identifier.
    pub id: EntryId,
    /// Queue this entry belongs to.
    pub queue_id: QueueId,
    /// Customer display name.
    pub customer_name: String,
    /// Customer phone, if provided at join time.
    #[serde(default)]
    pub phone: Option<String>,
    /// Requested service name, if any.
    #[serde(default)]
    pub service_name: Option<String>,
    /// Current lifecycle status.
    pub status: EntryStatus,
    /// Server-computed position among waiting entries. Meaningful only
    /// while `status == waiting`.
    pub position: u32,
    /// Short human-facing ticket identifier shown on screens.
    pub ticket_number: String,
    /// When the customer joined.
    pub joined_at: DateTime<Utc>,
    /// When service began, if it has.
    #[serde(default)]
    pub served_at: Option<DateTime<Utc>>,
    /// When the entry reached a terminal state, if it has.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Opaque secret for the customer's public status lookup. Present
    /// only in the join response addressed to the customer.
    #[serde(default)]
    pub token: Option<String>,
}

impl QueueEntry {
    /// Timestamp the entry's current phase began: `served_at` once
    /// service has started, `joined_at` otherwise.
    #[must_use]
    pub fn phase_started_at(&self) -> DateTime<Utc> {
        self.served_at.unwrap_or(self.joined_at)
    }
}
