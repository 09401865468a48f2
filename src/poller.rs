//! Interval- and push-driven refresh for one queue's view.
//!
//! [`StatusPoller`] runs a single background task that funnels both
//! trigger sources — the fixed-interval timer and matching invalidation
//! events from the bus — into one refresh call. Because the task is the
//! only place the refresh runs, concurrent triggers coalesce into
//! sequential fetches and the store's sequence guard handles any
//! response still racing from a previous trigger.
//!
//! The poller owns its task: dropping the poller aborts it, so a view
//! that unmounts or switches queues cannot leak a timer pointing at a
//! stale queue. Switching queues means dropping the old poller and
//! spawning a new one for the new service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::api::QueueTransport;
use crate::config::ClientConfig;
use crate::domain::QueueEvent;
use crate::service::QueueService;

/// Refresh cadence of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Unattended TV display: high-frequency polling.
    TvDisplay,
    /// Owner dashboard: relaxed polling.
    Dashboard,
    /// Interactive management screen: no timer, push-invalidation only.
    Manual,
}

impl PollMode {
    /// The timer interval for this mode, or `None` for push-only.
    #[must_use]
    pub const fn interval(self, config: &ClientConfig) -> Option<Duration> {
        match self {
            Self::TvDisplay => Some(config.tv_poll_interval),
            Self::Dashboard => Some(config.dashboard_poll_interval),
            Self::Manual => None,
        }
    }
}

/// Background refresh task for one [`QueueService`].
#[derive(Debug)]
pub struct StatusPoller {
    handle: JoinHandle<()>,
}

impl StatusPoller {
    /// Spawns the poller task.
    ///
    /// An immediate initial refresh runs before the first tick so views
    /// never start empty. Poll failures are logged and retried on the
    /// next trigger — there is no backoff; the fixed interval is the
    /// retry schedule. An unauthorized failure stops the poller, since
    /// the session is gone and every further poll would fail the same
    /// way.
    #[must_use]
    pub fn spawn<T: QueueTransport + 'static>(
        service: Arc<QueueService<T>>,
        interval: Option<Duration>,
        mut invalidations: broadcast::Receiver<QueueEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let queue_id = service.queue_id();
            let mut ticker = interval.map(tokio::time::interval);
            if let Some(t) = ticker.as_mut() {
                // The immediate first tick is consumed here; the explicit
                // initial refresh below replaces it.
                t.tick().await;
            }

            if !poll_once(&service).await {
                return;
            }

            loop {
                tokio::select! {
                    _ = tick(ticker.as_mut()) => {
                        if !poll_once(&service).await {
                            break;
                        }
                    }
                    event = invalidations.recv() => {
                        match event {
                            Ok(event) if event.queue_id() == Some(queue_id) => {
                                if !poll_once(&service).await {
                                    break;
                                }
                            }
                            Ok(_) => {} // different queue; not our trigger
                            Err(broadcast::error::RecvError::Lagged(n)) => {
                                // Missed signals are harmless: one refresh
                                // resynchronizes the whole snapshot.
                                tracing::warn!(lagged = n, %queue_id, "poller lagged behind event bus");
                                if !poll_once(&service).await {
                                    break;
                                }
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }

            tracing::debug!(%queue_id, "poller stopped");
        });

        Self { handle }
    }

    /// Returns `true` once the task has exited (fatal error or closed bus).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Waits for the next timer tick, or forever in push-only mode.
async fn tick(ticker: Option<&mut tokio::time::Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Runs one refresh. Returns `false` when polling must stop.
async fn poll_once<T: QueueTransport>(service: &QueueService<T>) -> bool {
    match service.refresh().await {
        Ok(_) => true,
        Err(err) if err.is_fatal() => {
            tracing::error!(queue_id = %service.queue_id(), %err, "poller stopping");
            false
        }
        Err(err) => {
            // Silent staleness by design: the view keeps its last
            // snapshot and the next trigger retries.
            tracing::warn!(queue_id = %service.queue_id(), %err, "poll failed; will retry");
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventBus;
    use crate::domain::queue_entry::EntryStatus;
    use crate::test_support::{FakeTransport, make_entry};
    use chrono::Utc;

    fn make_service(transport: &FakeTransport, bus: &EventBus) -> Arc<QueueService<FakeTransport>> {
        Arc::new(QueueService::new(
            Arc::new(transport.clone()),
            bus.clone(),
            transport.queue_id,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn interval_mode_refreshes_on_schedule() {
        let transport = FakeTransport::new();
        transport.seed_entries(vec![make_entry(
            transport.queue_id,
            "a",
            EntryStatus::Waiting,
            1,
        )]);
        let bus = EventBus::new(16);
        let service = make_service(&transport, &bus);

        let poller = StatusPoller::spawn(
            Arc::clone(&service),
            Some(Duration::from_secs(5)),
            bus.subscribe(),
        );

        // Initial refresh.
        tokio::time::sleep(Duration::from_millis(10)).await;
        let after_start = transport.fetch_calls();
        assert_eq!(after_start, 1);

        // Two ticks' worth of virtual time.
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(transport.fetch_calls() >= after_start + 2);

        drop(poller);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_mode_only_refreshes_on_invalidation() {
        let transport = FakeTransport::new();
        let bus = EventBus::new(16);
        let service = make_service(&transport, &bus);

        let poller = StatusPoller::spawn(Arc::clone(&service), None, bus.subscribe());

        tokio::time::sleep(Duration::from_secs(60)).await;
        // Only the initial refresh; no timer in manual mode.
        assert_eq!(transport.fetch_calls(), 1);

        bus.publish(QueueEvent::EntriesInvalidated {
            queue_id: service.queue_id(),
            timestamp: Utc::now(),
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(transport.fetch_calls(), 2);

        drop(poller);
    }

    #[tokio::test(start_paused = true)]
    async fn events_for_other_queues_are_ignored() {
        let transport = FakeTransport::new();
        let bus = EventBus::new(16);
        let service = make_service(&transport, &bus);

        let poller = StatusPoller::spawn(Arc::clone(&service), None, bus.subscribe());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(transport.fetch_calls(), 1);

        bus.publish(QueueEvent::EntriesInvalidated {
            queue_id: crate::domain::ids::QueueId::new(),
            timestamp: Utc::now(),
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(transport.fetch_calls(), 1);

        drop(poller);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_poll_wakes_snapshot_watchers() {
        let transport = FakeTransport::new();
        let bus = EventBus::new(16);
        let service = make_service(&transport, &bus);

        let poller = StatusPoller::spawn(
            Arc::clone(&service),
            Some(Duration::from_secs(5)),
            bus.subscribe(),
        );
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Server state changes with no realtime channel delivering events.
        transport.seed_entries(vec![make_entry(
            transport.queue_id,
            "walk-in",
            EntryStatus::Waiting,
            1,
        )]);
        let mut changes = service.store().watch_changes();
        changes.borrow_and_update();

        // The next tick installs the fresh snapshot and must wake a
        // render loop waiting on the store, not on the bus.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(matches!(changes.has_changed(), Ok(true)));
        assert_eq!(service.store().waiting().await.len(), 1);

        drop(poller);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_poller_stops_refreshing() {
        let transport = FakeTransport::new();
        let bus = EventBus::new(16);
        let service = make_service(&transport, &bus);

        let poller = StatusPoller::spawn(
            Arc::clone(&service),
            Some(Duration::from_secs(5)),
            bus.subscribe(),
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
        let before_drop = transport.fetch_calls();
        drop(poller);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.fetch_calls(), before_drop);
    }

    #[test]
    fn poll_modes_map_to_default_intervals() {
        let config = ClientConfig::from_env();
        assert_eq!(
            PollMode::TvDisplay.interval(&config),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            PollMode::Dashboard.interval(&config),
            Some(Duration::from_secs(30))
        );
        assert_eq!(PollMode::Manual.interval(&config), None);
    }
}
