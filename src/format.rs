//! Human-facing labels and WhatsApp message artifacts.
//!
//! Pure functions only: wait-time bucketing for screens, phone number
//! normalization, the fixed customer-message templates, and `wa.me`
//! deep-link construction. Message delivery itself is external — the
//! crate only produces the encoded link.

use chrono::{DateTime, Utc};

use crate::domain::appointment::Appointment;
use crate::domain::queue::Business;
use crate::domain::queue_entry::QueueEntry;
use crate::error::ClientError;

/// Country code prefixed to bare 10-digit numbers. The 10-digit rule is
/// a domestic-number heuristic; numbers of any other length pass through
/// untouched.
const DEFAULT_COUNTRY_CODE: &str = "91";

/// Buckets the time elapsed since `since` into a screen label:
/// `"Just now"`, `"Nm ago"`, or `"Xh Ym ago"`.
#[must_use]
pub fn wait_label(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(since).num_minutes().max(0);
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    format!("{hours}h {rest}m ago")
}

/// Normalizes a phone number for `wa.me` use: strips every non-digit
/// character, then prefixes the country code when exactly 10 digits
/// remain. Any other digit count passes through unchanged.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("{DEFAULT_COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

/// Which fixed message template to render for a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Sent by the customer right after joining.
    JoinConfirmation,
    /// Staff heads-up that the customer is almost up.
    NextInLine,
    /// Staff call that it is the customer's turn.
    YourTurn,
}

/// Renders the fixed WhatsApp text for a queue entry.
#[must_use]
pub fn message_text(kind: MessageKind, entry: &QueueEntry, business: &Business) -> String {
    match kind {
        MessageKind::JoinConfirmation => format!(
            "Hello! I just joined the queue at {}. My ticket is {}.",
            business.name, entry.ticket_number
        ),
        MessageKind::NextInLine => format!(
            "Hello {}! This is {}. It's almost your turn! Please come to the counter.",
            entry.customer_name, business.name
        ),
        MessageKind::YourTurn => format!(
            "Hello {}! This is {}. It's your turn now! Please come to the counter.",
            entry.customer_name, business.name
        ),
    }
}

/// Renders the appointment-confirmation WhatsApp text.
#[must_use]
pub fn appointment_confirmation(appointment: &Appointment) -> String {
    let service = appointment
        .service
        .as_ref()
        .map_or("your service", |s| s.name.as_str());
    format!(
        "Hello {}, confirming your appointment for {} on {} at {}.",
        appointment.customer_name(),
        service,
        appointment.start_time.format("%d %b %Y"),
        appointment.start_time.format("%H:%M")
    )
}

/// Builds a percent-encoded `wa.me` deep link for the given phone and
/// message text.
///
/// # Errors
///
/// Returns [`ClientError::Internal`] when the phone contains no digits
/// at all; a digit-only path cannot make the URL itself fail to parse.
pub fn whatsapp_link(phone: &str, text: &str) -> Result<reqwest::Url, ClientError> {
    let digits = normalize_phone(phone);
    if digits.is_empty() {
        return Err(ClientError::Internal(
            "wa.me link needs a phone number with at least one digit".to_string(),
        ));
    }
    reqwest::Url::parse_with_params(&format!("https://wa.me/{digits}"), &[("text", text)])
        .map_err(|err| ClientError::Internal(format!("invalid wa.me link: {err}")))
}
