//! Appointment records and the appointment lifecycle state machine.
//!
//! The lifecycle is linear with no back-edges exposed to staff:
//! `pending/scheduled → confirmed → checked_in → in_service → completed`,
//! with `cancelled` reachable from the pre-check-in states. Each status
//! maps to exactly one primary action and zero or more secondary actions;
//! notify-style secondary actions (alert, call) are not transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AppointmentId, BusinessId, ServiceId};

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Requested by the customer, awaiting business review.
    Pending,
    /// Slotted by the business but not yet confirmed. Behaves
    /// identically to [`Self::Pending`]; some deployments emit it.
    Scheduled,
    /// Confirmed by the business.
    Confirmed,
    /// Customer has arrived on site.
    CheckedIn,
    /// Service underway.
    InService,
    /// Finished. Terminal.
    Completed,
    /// Called off. Terminal.
    Cancelled,
}

/// A staff action exposed for an appointment in a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentAction {
    /// Accept the request.
    Confirm,
    /// Call the appointment off.
    Cancel,
    /// Mark the customer as arrived.
    CheckIn,
    /// Begin the service.
    StartService,
    /// Finish the service.
    Complete,
    /// Send a "next in line" style notification. Not a transition.
    Alert,
    /// Send a "your turn" style notification. Not a transition.
    Call,
}

impl AppointmentAction {
    /// The status this action moves the appointment to, or `None` for
    /// notify-only actions.
    #[must_use]
    pub const fn target_status(self) -> Option<AppointmentStatus> {
        match self {
            Self::Confirm => Some(AppointmentStatus::Confirmed),
            Self::Cancel => Some(AppointmentStatus::Cancelled),
            Self::CheckIn => Some(AppointmentStatus::CheckedIn),
            Self::StartService => Some(AppointmentStatus::InService),
            Self::Complete => Some(AppointmentStatus::Completed),
            Self::Alert | Self::Call => None,
        }
    }
}

impl AppointmentStatus {
    /// The single primary action exposed in this status, if any.
    #[must_use]
    pub const fn primary_action(self) -> Option<AppointmentAction> {
        match self {
            Self::Pending | Self::Scheduled => Some(AppointmentAction::Confirm),
            Self::Confirmed => Some(AppointmentAction::CheckIn),
            Self::CheckedIn => Some(AppointmentAction::StartService),
            Self::InService => Some(AppointmentAction::Complete),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Secondary actions exposed alongside the primary one.
    #[must_use]
    pub const fn secondary_actions(self) -> &'static [AppointmentAction] {
        match self {
            Self::Pending | Self::Scheduled => &[AppointmentAction::Cancel],
            Self::Confirmed | Self::CheckedIn => {
                &[AppointmentAction::Alert, AppointmentAction::Call]
            }
            Self::InService | Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Returns `true` if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` if moving to `next` is a legal lifecycle edge.
    ///
    /// `cancelled` is reachable from the pre-check-in states even where
    /// the action table exposes no cancel button (the edge exists for
    /// customer-initiated cancellations relayed by the server).
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        match self {
            Self::Pending | Self::Scheduled => {
                matches!(next, Self::Confirmed | Self::Cancelled)
            }
            Self::Confirmed => matches!(next, Self::CheckedIn | Self::Cancelled),
            Self::CheckedIn => matches!(next, Self::InService),
            Self::InService => matches!(next, Self::Completed),
            Self::Completed | Self::Cancelled => false,
        }
    }
}

/// Nested customer profile as delivered by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Customer account identifier.
    pub id: uuid::Uuid,
    /// Customer display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Customer phone.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Nested service summary as delivered by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSummary {
    /// Service display name.
    pub name: String,
    /// Nominal duration in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

/// A scheduled appointment owned by a business.
///
/// The customer holds only a read reference via a status token, never a
/// mutation right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Appointment identifier.
    pub id: AppointmentId,
    /// Owning business.
    pub business_id: BusinessId,
    /// Booked service, if recorded.
    #[serde(default)]
    pub service_id: Option<ServiceId>,
    /// Registered customer, if the booker has an account.
    #[serde(default)]
    pub customer_id: Option<uuid::Uuid>,
    /// Guest name when booked without an account.
    #[serde(default)]
    pub guest_name: Option<String>,
    /// Guest phone when booked without an account.
    #[serde(default)]
    pub guest_phone: Option<String>,
    /// Scheduled start.
    pub start_time: DateTime<Utc>,
    /// Scheduled end.
    pub end_time: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: AppointmentStatus,
    /// Nested customer profile, when expanded by the API.
    #[serde(default, rename = "profiles")]
    pub customer: Option<CustomerProfile>,
    /// Nested service summary, when expanded by the API.
    #[serde(default, rename = "services")]
    pub service: Option<ServiceSummary>,
}

impl Appointment {
    /// Best available customer display name.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        if let Some(profile) = &self.customer
            && let Some(name) = &profile.full_name
        {
            return name;
        }
        self.guest_name.as_deref().unwrap_or("Guest")
    }

    /// Best available customer phone.
    #[must_use]
    pub fn customer_phone(&self) -> Option<&str> {
        if let Some(profile) = &self.customer
            && let Some(phone) = &profile.phone
        {
            return Some(phone);
        }
        self.guest_phone.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::CheckedIn,
        AppointmentStatus::InService,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    #[test]
    fn action_table_matches_lifecycle() {
        assert_eq!(
            AppointmentStatus::Pending.primary_action(),
            Some(AppointmentAction::Confirm)
        );
        assert_eq!(
            AppointmentStatus::Scheduled.primary_action(),
            Some(AppointmentAction::Confirm)
        );
        assert_eq!(
            AppointmentStatus::Confirmed.primary_action(),
            Some(AppointmentAction::CheckIn)
        );
        assert_eq!(
            AppointmentStatus::CheckedIn.primary_action(),
            Some(AppointmentAction::StartService)
        );
        assert_eq!(
            AppointmentStatus::InService.primary_action(),
            Some(AppointmentAction::Complete)
        );
        assert_eq!(AppointmentStatus::Completed.primary_action(), None);
        assert_eq!(AppointmentStatus::Cancelled.primary_action(), None);
    }

    #[test]
    fn secondary_actions_match_table() {
        assert_eq!(
            AppointmentStatus::Pending.secondary_actions(),
            &[AppointmentAction::Cancel]
        );
        assert_eq!(
            AppointmentStatus::Confirmed.secondary_actions(),
            &[AppointmentAction::Alert, AppointmentAction::Call]
        );
        assert_eq!(
            AppointmentStatus::CheckedIn.secondary_actions(),
            &[AppointmentAction::Alert, AppointmentAction::Call]
        );
        assert!(AppointmentStatus::InService.secondary_actions().is_empty());
        assert!(AppointmentStatus::Completed.secondary_actions().is_empty());
        assert!(AppointmentStatus::Cancelled.secondary_actions().is_empty());
    }

    #[test]
    fn in_service_exposes_only_complete() {
        let status = AppointmentStatus::InService;
        assert_eq!(status.primary_action(), Some(AppointmentAction::Complete));
        assert!(status.secondary_actions().is_empty());
        assert!(!status.can_transition(AppointmentStatus::Confirmed));
        assert!(status.can_transition(AppointmentStatus::Completed));
    }

    #[test]
    fn terminal_states_have_no_edges() {
        for status in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
            assert!(status.is_terminal());
            for next in ALL {
                assert!(!status.can_transition(next));
            }
        }
    }

    #[test]
    fn lifecycle_is_linear_with_cancel_edges() {
        assert!(AppointmentStatus::Pending.can_transition(AppointmentStatus::Confirmed));
        assert!(AppointmentStatus::Pending.can_transition(AppointmentStatus::Cancelled));
        assert!(AppointmentStatus::Scheduled.can_transition(AppointmentStatus::Confirmed));
        assert!(AppointmentStatus::Confirmed.can_transition(AppointmentStatus::CheckedIn));
        assert!(AppointmentStatus::Confirmed.can_transition(AppointmentStatus::Cancelled));
        assert!(AppointmentStatus::CheckedIn.can_transition(AppointmentStatus::InService));
        // No skipping ahead, no going back.
        assert!(!AppointmentStatus::Pending.can_transition(AppointmentStatus::InService));
        assert!(!AppointmentStatus::CheckedIn.can_transition(AppointmentStatus::Cancelled));
        assert!(!AppointmentStatus::Confirmed.can_transition(AppointmentStatus::Pending));
    }

    #[test]
    fn notify_actions_are_not_transitions() {
        assert_eq!(AppointmentAction::Alert.target_status(), None);
        assert_eq!(AppointmentAction::Call.target_status(), None);
        assert_eq!(
            AppointmentAction::Confirm.target_status(),
            Some(AppointmentStatus::Confirmed)
        );
    }

    #[test]
    fn appointment_prefers_profile_over_guest_fields() {
        let json = format!(
            r#"{{
                "id": "{}",
                "business_id": "{}",
                "start_time": "2026-08-27T10:00:00Z",
                "end_time": "2026-08-27T10:30:00Z",
                "status": "pending",
                "guest_name": "Walk-in",
                "profiles": {{"id": "{}", "full_name": "Ravi", "phone": "9876543210"}}
            }}"#,
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        );
        let Ok(apt) = serde_json::from_str::<Appointment>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(apt.customer_name(), "Ravi");
        assert_eq!(apt.customer_phone(), Some("9876543210"));
    }
}
