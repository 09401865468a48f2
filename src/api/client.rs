//! HTTP client for the external QueueUp API.
//!
//! [`ApiClient`] owns the base-URL normalization, bearer-token injection,
//! and the central 401 handling: an unauthorized response tears down the
//! injected [`Session`] before surfacing [`ClientError::Unauthorized`],
//! so no caller ever retries with a dead credential.
//!
//! The [`QueueTransport`] trait is the seam between the coordination
//! layer and the wire: services are generic over it, and tests exercise
//! them against an in-memory fake instead of a live server.

use std::future::Future;

use serde::de::DeserializeOwned;

use super::schemas::{
    AccountStatus, ApiEnvelope, AppointmentStatusRequest, BusinessWithQueues,
    ChangeNotification, DailySummary, DashboardBusiness, DashboardUser, DisplaySnapshot,
    EntryStatusRequest, ErrorEnvelope, JoinQueueRequest, PublicQueueStatus, UserRole,
    VerifyOtpResponse,
};
use crate::config::ClientConfig;
use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::ids::{AppointmentId, EntryId, QueueId, ServiceId};
use crate::domain::queue::{Business, Queue, Service};
use crate::domain::queue_entry::{EntryStatus, QueueEntry};
use crate::error::ClientError;
use crate::session::{Credentials, Session};

/// Wire operations consumed by the coordination layer.
///
/// Implemented by [`ApiClient`] for production and by in-memory fakes in
/// tests. All methods are read-or-mutate calls against the external API;
/// none of them touch local state.
pub trait QueueTransport: Send + Sync {
    /// Fetches today's entries for a queue, in server order.
    fn entries_today(
        &self,
        queue_id: QueueId,
    ) -> impl Future<Output = Result<Vec<QueueEntry>, ClientError>> + Send;

    /// Requests a status transition for a queue entry, returning the
    /// server's updated copy.
    fn update_entry_status(
        &self,
        entry_id: EntryId,
        status: EntryStatus,
    ) -> impl Future<Output = Result<QueueEntry, ClientError>> + Send;

    /// Fetches the appointments owned by the caller's business.
    fn business_appointments(
        &self,
    ) -> impl Future<Output = Result<Vec<Appointment>, ClientError>> + Send;

    /// Requests a status transition for an appointment, returning the
    /// server's updated copy.
    fn update_appointment_status(
        &self,
        appointment_id: AppointmentId,
        status: AppointmentStatus,
    ) -> impl Future<Output = Result<Appointment, ClientError>> + Send;

    /// Creates a queue entry on behalf of a customer (public, no auth).
    fn join_queue(
        &self,
        request: &JoinQueueRequest,
    ) -> impl Future<Output = Result<QueueEntry, ClientError>> + Send;

    /// Looks up a customer's own entry status by opaque token (public).
    fn public_status(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<PublicQueueStatus, ClientError>> + Send;

    /// Fetches the queues owned by the caller's business.
    fn my_queues(&self) -> impl Future<Output = Result<Vec<Queue>, ClientError>> + Send;

    /// Calls the next waiting entry of a queue.
    fn advance_queue(
        &self,
        queue_id: QueueId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Deletes today's entries of a queue.
    fn reset_today(
        &self,
        queue_id: QueueId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Production HTTP client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Creates a client bound to the configured base URL and session.
    #[must_use]
    pub fn new(config: &ClientConfig, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
            session,
        }
    }

    /// Returns the injected session handle.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Sends a request, applies the central status handling, and decodes
    /// the `{data}` envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.exchange(builder).await?;
        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => Ok(envelope.data),
            Err(err) => Err(ClientError::MalformedPayload(format!(
                "response did not match expected schema: {err}"
            ))),
        }
    }

    /// Sends a request where only the status matters; the body is
    /// discarded after the status handling.
    async fn send_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), ClientError> {
        self.exchange(builder).await.map(|_| ())
    }

    async fn exchange(&self, builder: reqwest::RequestBuilder) -> Result<String, ClientError> {
        let builder = match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if status == 401 {
            // Fatal to the session: wipe the credential centrally so no
            // later call goes out with a dead token.
            self.session.teardown().await;
            tracing::warn!("server returned 401; session torn down");
            return Err(ClientError::Unauthorized);
        }

        if !(200..300).contains(&status) {
            return Err(ClientError::from_status(status, error_message(&body, status)));
        }

        Ok(body)
    }

    /// Requests a one-time password for the given phone number.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn send_otp(&self, phone: &str) -> Result<(), ClientError> {
        self.send_unit(
            self.http
                .post(self.url("/auth/otp"))
                .json(&serde_json::json!({ "phone": phone })),
        )
        .await
    }

    /// Verifies an OTP and installs the issued credential into the
    /// session on success.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> Result<(), ClientError> {
        let verified: VerifyOtpResponse = self
            .send(
                self.http
                    .post(self.url("/auth/verify"))
                    .json(&serde_json::json!({ "phone": phone, "otp": otp })),
            )
            .await?;

        self.session
            .install(Credentials {
                access_token: verified.session.access_token,
                user: verified.user,
            })
            .await;
        tracing::info!("session established");
        Ok(())
    }

    /// Logs out: clears the credential.
    pub async fn logout(&self) {
        self.session.teardown().await;
        tracing::info!("session cleared");
    }

    /// Fetches a business and its queues by public slug (no auth).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn business_by_slug(&self, slug: &str) -> Result<BusinessWithQueues, ClientError> {
        self.send(self.http.get(self.url(&format!("/businesses/slug/{slug}"))))
            .await
    }

    /// Fetches the public TV-display snapshot for a business slug.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn display_data(&self, slug: &str) -> Result<DisplaySnapshot, ClientError> {
        self.send(self.http.get(self.url(&format!("/public/display/{slug}"))))
            .await
    }

    /// Creates a queue for the caller's business.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn create_queue(&self, body: &serde_json::Value) -> Result<Queue, ClientError> {
        self.send(self.http.post(self.url("/queues")).json(body)).await
    }

    /// Updates a queue's settings (name, status, wait multiplier).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn update_queue(
        &self,
        queue_id: QueueId,
        body: &serde_json::Value,
    ) -> Result<Queue, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/queues/{queue_id}")))
                .json(body),
        )
        .await
    }

    /// Deletes a queue.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn delete_queue(&self, queue_id: QueueId) -> Result<(), ClientError> {
        self.send_unit(self.http.delete(self.url(&format!("/queues/{queue_id}"))))
            .await
    }

    /// Registers a business for the caller's account.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn create_business(&self, body: &serde_json::Value) -> Result<Business, ClientError> {
        self.send(self.http.post(self.url("/businesses")).json(body))
            .await
    }

    /// Updates a business profile (name, address, contact details).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn update_business(
        &self,
        business_id: crate::domain::ids::BusinessId,
        body: &serde_json::Value,
    ) -> Result<Business, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/businesses/{business_id}")))
                .json(body),
        )
        .await
    }

    /// Fetches the caller's bookable services.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn my_services(&self) -> Result<Vec<Service>, ClientError> {
        self.send(self.http.get(self.url("/services/my"))).await
    }

    /// Creates a bookable service.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn create_service(&self, body: &serde_json::Value) -> Result<Service, ClientError> {
        self.send(self.http.post(self.url("/services")).json(body))
            .await
    }

    /// Deletes a bookable service.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn delete_service(&self, service_id: ServiceId) -> Result<(), ClientError> {
        self.send_unit(self.http.delete(self.url(&format!("/services/{service_id}"))))
            .await
    }

    /// Fetches today's aggregate figures for the caller's business.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn daily_summary(&self) -> Result<DailySummary, ClientError> {
        self.send(self.http.get(self.url("/analytics/today"))).await
    }

    /// Lists platform users for the admin panel, with optional search,
    /// role filter, and pagination.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn admin_users(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
        page: Option<u32>,
    ) -> Result<Vec<DashboardUser>, ClientError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(search) = search {
            params.push(("search", search.to_string()));
        }
        if let Some(role) = role {
            params.push(("role", role.as_str().to_string()));
        }
        if let Some(page) = page {
            params.push(("page", page.to_string()));
        }
        self.send(self.http.get(self.url("/admin/users")).query(&params))
            .await
    }

    /// Lists all registered businesses for the admin panel.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn admin_businesses(&self) -> Result<Vec<DashboardBusiness>, ClientError> {
        self.send(self.http.get(self.url("/admin/businesses"))).await
    }

    /// Changes a user's platform role (admin only).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn update_user_role(
        &self,
        user_id: uuid::Uuid,
        role: UserRole,
    ) -> Result<(), ClientError> {
        self.send_unit(
            self.http
                .patch(self.url(&format!("/admin/users/{user_id}/role")))
                .json(&serde_json::json!({ "role": role })),
        )
        .await
    }

    /// Changes a user's moderation status, optionally forcing the
    /// verified flag (admin only).
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn update_user_status(
        &self,
        user_id: uuid::Uuid,
        status: AccountStatus,
        is_verified: Option<bool>,
    ) -> Result<(), ClientError> {
        self.send_unit(
            self.http
                .patch(self.url(&format!("/admin/users/{user_id}/status")))
                .json(&serde_json::json!({ "status": status, "is_verified": is_verified })),
        )
        .await
    }

    /// Invites a phone number to the platform as an administrator.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport or API failure.
    pub async fn invite_admin(&self, phone: &str) -> Result<(), ClientError> {
        self.send_unit(
            self.http
                .post(self.url("/admin/invite"))
                .json(&serde_json::json!({ "phone": phone })),
        )
        .await
    }
}

impl QueueTransport for ApiClient {
    async fn entries_today(&self, queue_id: QueueId) -> Result<Vec<QueueEntry>, ClientError> {
        self.send(self.http.get(self.url(&format!("/queues/{queue_id}/today"))))
            .await
    }

    async fn update_entry_status(
        &self,
        entry_id: EntryId,
        status: EntryStatus,
    ) -> Result<QueueEntry, ClientError> {
        self.send(
            self.http
                .patch(self.url(&format!("/queues/entries/{entry_id}/status")))
                .json(&EntryStatusRequest { status }),
        )
        .await
    }

    async fn business_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        self.send(self.http.get(self.url("/appointments/business")))
            .await
    }

    async fn update_appointment_status(
        &self,
        appointment_id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        self.send(
            self.http
                .patch(self.url(&format!("/appointments/{appointment_id}/status")))
                .json(&AppointmentStatusRequest { status }),
        )
        .await
    }

    async fn join_queue(&self, request: &JoinQueueRequest) -> Result<QueueEntry, ClientError> {
        self.send(self.http.post(self.url("/public/queue/join")).json(request))
            .await
    }

    async fn public_status(&self, token: &str) -> Result<PublicQueueStatus, ClientError> {
        self.send(
            self.http
                .get(self.url("/public/queue/status"))
                .query(&[("token", token)]),
        )
        .await
    }

    async fn my_queues(&self) -> Result<Vec<Queue>, ClientError> {
        self.send(self.http.get(self.url("/queues/my"))).await
    }

    async fn advance_queue(&self, queue_id: QueueId) -> Result<(), ClientError> {
        self.send_unit(
            self.http
                .post(self.url("/queues/next"))
                .json(&serde_json::json!({ "queue_id": queue_id })),
        )
        .await
    }

    async fn reset_today(&self, queue_id: QueueId) -> Result<(), ClientError> {
        self.send_unit(
            self.http
                .delete(self.url(&format!("/queues/{queue_id}/entries/today"))),
        )
        .await
    }
}

/// Extracts the server's failure message from an error body, falling back
/// to a generic description when the body is not the expected JSON.
fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| format!("API Error: {status}"))
}

/// Parses a realtime frame into a [`ChangeNotification`].
///
/// Exposed for the realtime listener; only the queue scoping is read,
/// everything else in the frame is ignored.
///
/// # Errors
///
/// Returns [`ClientError::MalformedPayload`] when the frame carries no
/// parsable queue id.
pub fn parse_change_notification(frame: &str) -> Result<ChangeNotification, ClientError> {
    serde_json::from_str(frame).map_err(|err| {
        ClientError::MalformedPayload(format!("unparsable change notification: {err}"))
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_client() -> ApiClient {
        let config = ClientConfig {
            api_base_url: "http://localhost:4000/api".to_string(),
            realtime_url: "ws://localhost:4000/realtime".to_string(),
            tv_poll_interval: std::time::Duration::from_secs(5),
            dashboard_poll_interval: std::time::Duration::from_secs(30),
            realtime_reconnect_delay: std::time::Duration::from_secs(5),
            event_bus_capacity: 16,
        };
        ApiClient::new(&config, Session::new())
    }

    #[test]
    fn url_joins_with_single_slash() {
        let client = make_client();
        assert_eq!(
            client.url("/queues/my"),
            "http://localhost:4000/api/queues/my"
        );
        assert_eq!(
            client.url("queues/my"),
            "http://localhost:4000/api/queues/my"
        );
    }

    #[test]
    fn error_message_prefers_server_text() {
        assert_eq!(error_message(r#"{"message": "queue is closed"}"#, 409), "queue is closed");
        assert_eq!(error_message("<html>oops</html>", 502), "API Error: 502");
        assert_eq!(error_message("{}", 500), "API Error: 500");
    }

    #[test]
    fn change_notification_round_trip() {
        let queue_id = QueueId::new();
        let frame = format!(r#"{{"queue_id": "{queue_id}", "op": "UPDATE"}}"#);
        let Ok(notification) = parse_change_notification(&frame) else {
            panic!("expected parsable frame");
        };
        assert_eq!(notification.queue_id, queue_id);
    }

    #[test]
    fn garbage_frame_is_rejected() {
        let result = parse_change_notification("not json");
        assert!(matches!(result, Err(ClientError::MalformedPayload(_))));
    }
}
