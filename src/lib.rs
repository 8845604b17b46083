//! # marketing-relay
//!
//! Origin-concealing proxy and polling client for an asynchronous
//! marketing-job backend.
//!
//! The relay sits between a browser and a job-processing backend. It
//! validates submissions (outreach CSV lists, lead-discovery seeds),
//! forwards them upstream, and re-houses the result location on its own
//! origin so the backend's address never reaches the caller. The polling
//! side of the crate drives repeated result lookups with a deterministic
//! backoff schedule, cooperative cancellation, and a download trigger for
//! the finished CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use marketing_relay::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.upstream.base_url = Some("http://jobs.internal:9000".to_string());
//!
//!     // Serve the proxy (blocks until SIGTERM/SIGINT)
//!     marketing_relay::api::start_api_server(Arc::new(config)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Poll delay schedule
pub mod backoff;
/// Configuration types
pub mod config;
/// Result download trigger
pub mod download;
/// Error types
pub mod error;
/// Polling client
pub mod poll;
/// Result-location rewriting
pub mod rewrite;
/// Upstream backend client
pub mod upstream;
/// Inbound request validation
pub mod validate;

// Re-export commonly used types
pub use config::{ApiConfig, Config, PollConfig, UpstreamConfig};
pub use download::{DownloadTrigger, FileDownloadTrigger};
pub use error::{Error, ErrorBody, Result, ValidationError};
pub use poll::{
    FetchStatus, HttpResultFetcher, PollOutcome, PollProgress, Poller, RejectReason,
    ResultFetcher, StatusCategory,
};
pub use rewrite::rewrite_result_url;
pub use upstream::UpstreamClient;

/// Waits for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal
///   registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
