//! Realtime change-notification listener.
//!
//! Maintains a websocket subscription scoped to one queue and turns
//! every matching frame into an [`QueueEvent::EntriesInvalidated`] on
//! the bus. Frames are pure invalidation signals: only the queue id is
//! read, the rest of the payload is untrusted and ignored, and the
//! poller's full re-fetch is the single source of entry data.
//!
//! A dropped connection is retried after a fixed delay — the same
//! no-backoff policy the pollers use.

use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::api::client::parse_change_notification;
use crate::domain::ids::QueueId;
use crate::domain::{EventBus, QueueEvent};
use crate::error::ClientError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Background websocket listener for one queue's change notifications.
///
/// Dropping the listener aborts the task and closes the subscription,
/// mirroring the poller's teardown-on-unmount contract.
#[derive(Debug)]
pub struct RealtimeListener {
    handle: JoinHandle<()>,
}

impl RealtimeListener {
    /// Spawns the listener task for the given channel URL and queue.
    #[must_use]
    pub fn spawn(
        url: String,
        queue_id: QueueId,
        event_bus: EventBus,
        reconnect_delay: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                match connect_async(url.as_str()).await {
                    Ok((socket, _response)) => {
                        tracing::info!(%queue_id, "realtime channel connected");
                        if let Err(err) = run_channel(socket, queue_id, &event_bus).await {
                            tracing::warn!(%queue_id, %err, "realtime channel closed");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%queue_id, %err, "realtime connect failed");
                    }
                }
                // Fixed delay, no backoff: the next poll tick covers any
                // notifications missed while disconnected.
                tokio::time::sleep(reconnect_delay).await;
            }
        });

        Self { handle }
    }

    /// Returns `true` once the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RealtimeListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Subscribes to the queue's channel and forwards matching frames until
/// the connection ends.
async fn run_channel(
    socket: Socket,
    queue_id: QueueId,
    event_bus: &EventBus,
) -> Result<(), ClientError> {
    let (mut tx, mut rx) = socket.split();

    let subscribe = serde_json::json!({
        "action": "subscribe",
        "channel": format!("queue-entries-{queue_id}"),
        "queue_id": queue_id,
    });
    tx.send(Message::text(subscribe.to_string()))
        .await
        .map_err(|err| ClientError::Realtime(err.to_string()))?;

    while let Some(frame) = rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                dispatch_frame(text.as_str(), queue_id, event_bus);
            }
            Ok(Message::Close(_)) => return Ok(()),
            Ok(_) => {}
            Err(err) => return Err(ClientError::Realtime(err.to_string())),
        }
    }
    Ok(())
}

/// Turns one text frame into an invalidation event when it is scoped to
/// the watched queue. Returns `true` if an event was published.
fn dispatch_frame(frame: &str, queue_id: QueueId, event_bus: &EventBus) -> bool {
    match parse_change_notification(frame) {
        Ok(notification) if notification.queue_id == queue_id => {
            let _ = event_bus.publish(QueueEvent::EntriesInvalidated {
                queue_id,
                timestamp: Utc::now(),
            });
            true
        }
        Ok(notification) => {
            tracing::trace!(other = %notification.queue_id, "frame for different queue");
            false
        }
        Err(err) => {
            // Rejected at the boundary; never propagated into the view.
            tracing::debug!(%err, "ignoring malformed realtime frame");
            false
        }
    }
}
