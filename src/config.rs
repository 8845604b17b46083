//! Configuration types for marketing-relay

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;
use utoipa::ToSchema;

/// Upstream backend settings
///
/// The base URL is the single piece of process-wide state the proxy
/// depends on. It is read from configuration on every request and is never
/// emitted to the caller; when unset, every endpoint fails closed with a
/// generic server error instead of refusing to start.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpstreamConfig {
    /// Base URL of the job-processing backend (e.g. "http://jobs.internal:9000")
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout for forwarded calls, in milliseconds (default: 30000)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// API server settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8787)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable the permissive CORS layer the browser contract requires (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Preflight cache lifetime in seconds (default: 86400)
    #[serde(default = "default_preflight_max_age_secs")]
    pub preflight_max_age_secs: u64,

    /// Serve interactive Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            preflight_max_age_secs: default_preflight_max_age_secs(),
            swagger_ui: false,
        }
    }
}

/// Polling client settings
///
/// Both knobs bound the backoff schedule; the schedule's shape itself is
/// fixed (see [`crate::backoff`]). Timeout is attempt-count based, not
/// wall-clock based.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
pub struct PollConfig {
    /// Maximum poll attempts before a session times out (default: 60)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Ceiling for a single backoff delay, in milliseconds (default: 15000)
    #[serde(default = "default_cap_ms")]
    pub cap_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            cap_ms: default_cap_ms(),
        }
    }
}

/// Main configuration for the relay
///
/// Fields are organized into logical sub-configs:
/// - [`upstream`](UpstreamConfig) — backend location and timeouts
/// - [`api`](ApiConfig) — bind address, CORS, documentation UI
/// - [`poll`](PollConfig) — polling client bounds
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Upstream backend settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling client settings
    #[serde(default)]
    pub poll: PollConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Recognized variables:
    /// - `UPSTREAM_BASE_URL` — backend base URL; validated as an absolute URL
    /// - `UPSTREAM_TIMEOUT_MS` — forwarded-request timeout
    /// - `RELAY_BIND_ADDRESS` — API bind address (`host:port`)
    /// - `RELAY_SWAGGER_UI` — `1`/`true` to serve Swagger UI
    /// - `POLL_MAX_ATTEMPTS`, `POLL_CAP_MS` — polling bounds
    ///
    /// A missing `UPSTREAM_BASE_URL` is not an error here: the proxy starts
    /// and fails closed per request. A malformed value is rejected.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(value) = std::env::var("UPSTREAM_BASE_URL") {
            Url::parse(&value).map_err(|e| Error::Config {
                message: format!("UPSTREAM_BASE_URL is not a valid URL: {e}"),
                key: Some("upstream.base_url".to_string()),
            })?;
            config.upstream.base_url = Some(value);
        }

        if let Ok(value) = std::env::var("UPSTREAM_TIMEOUT_MS") {
            config.upstream.request_timeout_ms = parse_env("UPSTREAM_TIMEOUT_MS", &value)?;
        }

        if let Ok(value) = std::env::var("RELAY_BIND_ADDRESS") {
            config.api.bind_address = value.parse().map_err(|e| Error::Config {
                message: format!("RELAY_BIND_ADDRESS is not a valid socket address: {e}"),
                key: Some("api.bind_address".to_string()),
            })?;
        }

        if let Ok(value) = std::env::var("RELAY_SWAGGER_UI") {
            config.api.swagger_ui = matches!(value.as_str(), "1" | "true" | "yes");
        }

        if let Ok(value) = std::env::var("POLL_MAX_ATTEMPTS") {
            config.poll.max_attempts = parse_env("POLL_MAX_ATTEMPTS", &value)?;
        }

        if let Ok(value) = std::env::var("POLL_CAP_MS") {
            config.poll.cap_ms = parse_env("POLL_CAP_MS", &value)?;
        }

        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| Error::Config {
        message: format!("{name} is not a valid number: {e}"),
        key: Some(name.to_string()),
    })
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}

fn default_preflight_max_age_secs() -> u64 {
    86_400
}

fn default_max_attempts() -> u32 {
    60
}

fn default_cap_ms() -> u64 {
    15_000
}

fn default_true() -> bool {
    true
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_documented_values() {
        let config = Config::default();

        assert!(config.upstream.base_url.is_none());
        assert_eq!(config.upstream.request_timeout_ms, 30_000);
        assert_eq!(
            config.api.bind_address,
            "127.0.0.1:8787".parse::<SocketAddr>().unwrap()
        );
        assert!(config.api.cors_enabled);
        assert_eq!(config.api.preflight_max_age_secs, 86_400);
        assert!(!config.api.swagger_ui);
        assert_eq!(config.poll.max_attempts, 60);
        assert_eq!(config.poll.cap_ms, 15_000);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert!(config.upstream.base_url.is_none());
        assert_eq!(config.poll.max_attempts, 60);
        assert!(config.api.cors_enabled);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config: Config = serde_json::from_str(
            r#"{
                "upstream": {"base_url": "http://jobs.internal:9000"},
                "poll": {"max_attempts": 5}
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.upstream.base_url.as_deref(),
            Some("http://jobs.internal:9000")
        );
        assert_eq!(config.poll.max_attempts, 5);
        // untouched fields keep their defaults
        assert_eq!(config.poll.cap_ms, 15_000);
        assert_eq!(config.upstream.request_timeout_ms, 30_000);
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut original = Config::default();
        original.upstream.base_url = Some("http://backend:1234".to_string());
        original.poll.max_attempts = 7;

        let json = serde_json::to_string(&original).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.upstream.base_url, original.upstream.base_url);
        assert_eq!(restored.poll.max_attempts, original.poll.max_attempts);
        assert_eq!(restored.api.bind_address, original.api.bind_address);
    }
}
