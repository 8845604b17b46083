//! Upstream backend client
//!
//! Thin reqwest wrapper over the three backend endpoints. The base URL is
//! resolved from configuration on every invocation, so a missing setting
//! fails closed per request instead of keeping the proxy from starting.
//! The base URL itself never appears in anything returned to the caller.

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use std::time::Duration;

/// Upstream path for outreach-message list submissions
pub const DM_LIST_PATH: &str = "/marketing/generate_dm_list";

/// Upstream path for lead-discovery submissions
pub const LEADS_PATH: &str = "/marketing/generate_leads";

/// Upstream path for result lookups
pub const RESULTS_PATH: &str = "/results";

/// Client for one upstream invocation
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Builds a client from configuration
    ///
    /// Fails with a configuration error when no base URL is set; the
    /// caller translates that into a generic server error so the fault is
    /// operator-visible only through logs.
    pub fn from_config(config: &UpstreamConfig, http: reqwest::Client) -> Result<Self> {
        let base = config.base_url.as_deref().ok_or_else(|| Error::Config {
            message: "upstream base URL is not configured".to_string(),
            key: Some("upstream.base_url".to_string()),
        })?;

        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.request_timeout_ms),
            http,
        })
    }

    /// Forwards an outreach CSV body to the submission endpoint
    pub async fn submit_dm_list(&self, csv: String) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}{DM_LIST_PATH}", self.base))
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .timeout(self.timeout)
            .body(csv)
            .send()
            .await?;
        Ok(response)
    }

    /// Forwards a validated leads payload to the submission endpoint
    pub async fn submit_leads(&self, payload: &serde_json::Value) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(format!("{}{LEADS_PATH}", self.base))
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;
        Ok(response)
    }

    /// Looks up a job result, forwarding the caller's query string unmodified
    pub async fn fetch_result(&self, raw_query: Option<&str>) -> Result<reqwest::Response> {
        let url = match raw_query {
            Some(query) if !query.is_empty() => {
                format!("{}{RESULTS_PATH}?{query}", self.base)
            }
            _ => format!("{}{RESULTS_PATH}", self.base),
        };
        let response = self.http.get(url).timeout(self.timeout).send().await?;
        Ok(response)
    }
}
