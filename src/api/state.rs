//! Application state for the proxy server

use crate::Config;
use crate::error::Result;
use crate::upstream::UpstreamClient;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone). The handlers
/// themselves are stateless; the only shared pieces are the configuration
/// and a pooled HTTP client reused across upstream calls.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide configuration
    pub config: Arc<Config>,

    /// Pooled HTTP client for upstream forwarding
    pub http: reqwest::Client,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Upstream client for one invocation
    ///
    /// Reads the base URL from configuration; fails when it is unset so
    /// the handler can fail closed with a generic server error.
    pub fn upstream(&self) -> Result<UpstreamClient> {
        UpstreamClient::from_config(&self.config.upstream, self.http.clone())
    }
}
