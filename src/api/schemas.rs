//! Typed wire schemas for the external QueueUp API.
//!
//! Every payload crossing the HTTP boundary is deserialized into one of
//! these shapes; malformed payloads are rejected at the boundary instead
//! of propagating missing fields into the view. Unknown extra fields are
//! ignored for forward compatibility.

use serde::{Deserialize, Serialize};

use crate::domain::appointment::AppointmentStatus;
use crate::domain::ids::{QueueId, ServiceId};
use crate::domain::queue::{Business, Queue};
use crate::domain::queue_entry::{EntryStatus, QueueEntry};

/// Standard success envelope: `{ "data": ..., "message": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Endpoint-specific payload.
    pub data: T,
    /// Optional human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shape; only `message` is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    /// Server-provided failure description.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `PATCH .../status` for queue entries.
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatusRequest {
    /// Requested next status.
    pub status: EntryStatus,
}

/// Body of `PATCH /appointments/:id/status`.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentStatusRequest {
    /// Requested next status.
    pub status: AppointmentStatus,
}

/// Body of `POST /public/queue/join`.
#[derive(Debug, Clone, Serialize)]
pub struct JoinQueueRequest {
    /// Queue to join.
    pub queue_id: QueueId,
    /// Customer display name.
    pub customer_name: String,
    /// Optional customer phone for WhatsApp notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Optional free-text service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Optional selected service IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_ids: Option<Vec<ServiceId>>,
}

/// Payload of `GET /public/queue/status?token=…`.
///
/// A read-only projection addressed to the customer holding the status
/// token; deliberately carries no other customers' data.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicQueueStatus {
    /// Business display name.
    pub business_name: String,
    /// Business slug, when the join page should be linkable.
    #[serde(default)]
    pub business_slug: Option<String>,
    /// Ticket identifier shown to the customer.
    pub display_token: String,
    /// Ticket currently being served, if any.
    #[serde(default)]
    pub current_serving: Option<String>,
    /// The customer's position among waiting entries.
    pub position: u32,
    /// Server-estimated wait in minutes.
    #[serde(default)]
    pub estimated_wait_time: u32,
    /// The customer's entry status.
    pub status: EntryStatus,
}

/// Payload of the public TV-display endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySnapshot {
    /// Business being displayed.
    pub business: Business,
    /// Today's entries across the business's queues.
    pub entries: Vec<QueueEntry>,
}

/// Business profile with its queues, from `GET /businesses/slug/:slug`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessWithQueues {
    /// The business profile.
    #[serde(flatten)]
    pub business: Business,
    /// Queues offered by the business.
    #[serde(default)]
    pub queues: Vec<Queue>,
}

/// Authenticated user profile, from `POST /auth/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// User account identifier.
    pub id: uuid::Uuid,
    /// Display name, when set.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Login phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Session block of the OTP verification response.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    /// Bearer token for subsequent private calls.
    pub access_token: String,
}

/// Payload of `POST /auth/verify`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    /// Issued session tokens.
    pub session: SessionTokens,
    /// Authenticated user profile.
    pub user: UserProfile,
}

/// Platform role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// Business owner.
    Owner,
    /// Regular customer.
    Customer,
}

impl UserRole {
    /// Wire form of the role, as used in query parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::Customer => "customer",
        }
    }
}

/// Moderation status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered, not yet reviewed.
    Pending,
    /// In good standing.
    Active,
    /// Access revoked by an administrator.
    Blocked,
}

/// User row of the admin panel, from `GET /admin/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardUser {
    /// User account identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Platform role.
    pub role: UserRole,
    /// Login phone number.
    pub phone: String,
    /// Whether the phone number is verified.
    pub is_verified: bool,
    /// Moderation status.
    pub status: AccountStatus,
    /// Registration time.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Owner contact nested in an admin business row.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerContact {
    /// Owner display name.
    pub full_name: String,
    /// Owner phone number.
    pub phone: String,
}

/// Business row of the admin panel, from `GET /admin/businesses`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardBusiness {
    /// Business identifier.
    pub id: crate::domain::ids::BusinessId,
    /// Display name.
    pub name: String,
    /// Public URL slug.
    pub slug: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Owning account's contact details.
    pub owner: OwnerContact,
    /// Registration time.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Aggregates of `GET /analytics/today`. The server emits camelCase
/// keys on this endpoint only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Customers who joined any queue today.
    pub total_customers: u32,
    /// Visits completed today.
    pub completed_visits: u32,
    /// Revenue booked today.
    pub total_revenue: f64,
    /// Mean wait in minutes across completed visits.
    pub avg_wait_time_minutes: f64,
}

/// Frame received on the realtime change-notification channel.
///
/// Only the queue scoping is consumed; all other fields of the payload
/// are untrusted and ignored — every notification triggers a full
/// re-fetch instead of a local patch.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeNotification {
    /// Queue whose entries changed.
    pub queue_id: QueueId,
}
