//! queueup-watch entry point.
//!
//! Follows one queue the way a TV display does: an initial fetch, a
//! fixed 5-second poll, a realtime invalidation channel, and a render
//! pass that logs the waiting and serving lists whenever the snapshot
//! changes.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use queueup_client::api::ApiClient;
use queueup_client::config::ClientConfig;
use queueup_client::domain::EventBus;
use queueup_client::domain::ids::QueueId;
use queueup_client::format::wait_label;
use queueup_client::poller::{PollMode, StatusPoller};
use queueup_client::realtime::RealtimeListener;
use queueup_client::service::QueueService;
use queueup_client::session::{Credentials, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ClientConfig::from_env();
    let queue_id: QueueId = std::env::var("QUEUEUP_QUEUE_ID")
        .context("QUEUEUP_QUEUE_ID is required")?
        .parse()
        .context("QUEUEUP_QUEUE_ID must be a UUID")?;
    tracing::info!(api = %config.api_base_url, %queue_id, "starting queueup-watch");

    // Build session and transport
    let session = Session::new();
    if let Ok(token) = std::env::var("QUEUEUP_ACCESS_TOKEN") {
        session
            .install(Credentials {
                access_token: token,
                user: queueup_client::api::schemas::UserProfile {
                    id: uuid::Uuid::nil(),
                    full_name: None,
                    phone: None,
                },
            })
            .await;
    }
    let client = Arc::new(ApiClient::new(&config, session));

    // Build domain and service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let service = Arc::new(QueueService::new(client, event_bus.clone(), queue_id));

    // Background tasks: realtime invalidations feed the poller
    let _listener = RealtimeListener::spawn(
        config.realtime_url.clone(),
        queue_id,
        event_bus.clone(),
        config.realtime_reconnect_delay,
    );
    let _poller = StatusPoller::spawn(
        Arc::clone(&service),
        PollMode::TvDisplay.interval(&config),
        event_bus.subscribe(),
    );

    // Render whenever the snapshot changes, whether the refresh came
    // from the timer or from a realtime invalidation.
    let mut changes = service.store().watch_changes();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&service).await;
            }
        }
    }

    tracing::info!("shutting down");
    Ok(())
}

/// Logs the current waiting and serving lists from the local snapshot.
async fn render<T: queueup_client::api::QueueTransport>(service: &QueueService<T>) {
    let now = Utc::now();
    let store = service.store();
    for entry in store.serving().await {
        tracing::info!(
            ticket = %entry.ticket_number,
            name = %entry.customer_name,
            since = %wait_label(entry.phase_started_at(), now),
            "serving"
        );
    }
    for entry in store.waiting().await {
        tracing::info!(
            ticket = %entry.ticket_number,
            name = %entry.customer_name,
            position = entry.position,
            waited = %wait_label(entry.joined_at, now),
            "waiting"
        );
    }
}
