//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with sensible defaults matching the
//! hosted QueueUp deployment.

use std::time::Duration;

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the QueueUp REST API, without a trailing slash
    /// (e.g. `http://localhost:4000/api`).
    pub api_base_url: String,

    /// WebSocket URL of the realtime change-notification channel.
    pub realtime_url: String,

    /// Poll interval for the unattended TV display view.
    pub tv_poll_interval: Duration,

    /// Poll interval for the owner dashboard view.
    pub dashboard_poll_interval: Duration,

    /// Fixed delay before re-connecting a dropped realtime channel.
    pub realtime_reconnect_delay: Duration,

    /// Capacity of the invalidation event bus broadcast channel.
    pub event_bus_capacity: usize,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or unparsable.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = trim_trailing_slash(
            &std::env::var("QUEUEUP_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/api".to_string()),
        );

        let realtime_url = std::env::var("QUEUEUP_REALTIME_URL")
            .unwrap_or_else(|_| "ws://localhost:4000/realtime".to_string());

        let tv_poll_interval = Duration::from_secs(parse_env("QUEUEUP_TV_POLL_SECS", 5));
        let dashboard_poll_interval =
            Duration::from_secs(parse_env("QUEUEUP_DASHBOARD_POLL_SECS", 30));
        let realtime_reconnect_delay =
            Duration::from_secs(parse_env("QUEUEUP_REALTIME_RECONNECT_SECS", 5));

        let event_bus_capacity = parse_env("QUEUEUP_EVENT_BUS_CAPACITY", 1024);

        Self {
            api_base_url,
            realtime_url,
            tv_poll_interval,
            dashboard_poll_interval,
            realtime_reconnect_delay,
            event_bus_capacity,
        }
    }
}

/// Removes any trailing `/` so endpoint paths can always start with one.
fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
