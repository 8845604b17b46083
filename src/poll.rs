//! Polling client for asynchronous job results
//!
//! A polling session is a cooperative, single-task loop: one result fetch
//! per attempt, a progress callback at every classified transition, then a
//! cancellation-interruptible backoff sleep. Sessions share no state; any
//! number may run concurrently against different tokens.
//!
//! Terminal states are deliberately narrow: a ready result, an upstream
//! token rejection, schedule exhaustion, or cancellation. Everything else
//! (transport failures, unexpected statuses) is transient and retried.

use crate::backoff;
use crate::config::PollConfig;
use crate::download::DownloadTrigger;
use crate::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Why the upstream refused a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The token was not recognized
    InvalidToken,
    /// The token expired or was already redeemed
    Expired,
}

/// Classified status of a single result fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The result is ready to download
    Ready,
    /// The job is still processing
    Pending,
    /// The upstream refused the token; polling must stop
    Rejected {
        /// Why the token was refused
        reason: RejectReason,
        /// Upstream-provided message, when one was readable
        message: String,
    },
    /// A status outside the documented contract; treated as transient
    Unexpected {
        /// The HTTP status code observed
        status: u16,
    },
}

/// Terminal outcome of a polling session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The result became ready and the download trigger was invoked
    Ready,
    /// The upstream rejected the token; retrying cannot help
    Rejected {
        /// Why the token was refused
        reason: RejectReason,
        /// Upstream-provided message, when one was readable
        message: String,
    },
    /// The backoff schedule ran out before a terminal status arrived
    ///
    /// Distinct from rejection: the input was fine, the result just never
    /// became ready within the attempt budget.
    TimedOut {
        /// Number of fetch attempts made
        attempts: u32,
    },
    /// The session was cancelled before reaching any other terminal state
    Cancelled,
}

/// Broad category of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Job still processing; the session will wait and retry
    Pending,
    /// Transport failure or unexpected status; the session will retry
    Transient,
    /// Result ready; the session is about to trigger the download
    Ready,
    /// Token rejected; the session is terminating
    Rejected,
}

/// Progress event passed to the caller's callback once per attempt
#[derive(Debug, Clone)]
pub struct PollProgress {
    /// Zero-based attempt index
    pub attempt: u32,
    /// Broad category of what the attempt observed
    pub category: StatusCategory,
    /// Human-readable description suitable for display
    pub message: String,
}

/// Fetches and classifies the status of one result lookup
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    /// Performs one lookup of `location` (a same-origin result path)
    ///
    /// Transport-level failures surface as `Err` and are retried by the
    /// polling loop.
    async fn fetch(&self, location: &str) -> Result<FetchStatus>;
}

/// Production [`ResultFetcher`] speaking the proxy's result contract
#[derive(Debug, Clone)]
pub struct HttpResultFetcher {
    origin: String,
    http: reqwest::Client,
}

impl HttpResultFetcher {
    /// Creates a fetcher that resolves result locations against `origin`
    /// (the proxy's own origin, e.g. "http://127.0.0.1:8787")
    pub fn new(origin: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl ResultFetcher for HttpResultFetcher {
    async fn fetch(&self, location: &str) -> Result<FetchStatus> {
        let response = self
            .http
            .get(format!("{}{location}", self.origin))
            .send()
            .await?;

        let status = response.status().as_u16();
        let classified = match status {
            200 => FetchStatus::Ready,
            202 => FetchStatus::Pending,
            400 | 410 => {
                let reason = if status == 410 {
                    RejectReason::Expired
                } else {
                    RejectReason::InvalidToken
                };
                FetchStatus::Rejected {
                    reason,
                    message: rejection_message(response).await,
                }
            }
            other => FetchStatus::Unexpected { status: other },
        };
        Ok(classified)
    }
}

/// Pulls the `error` field out of a rejection body, with a fallback
async fn rejection_message(response: reqwest::Response) -> String {
    let status = response.status().as_u16();
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| format!("result lookup rejected with status {status}"))
}

/// Drives polling sessions against a result fetcher and download trigger
///
/// The poller itself is stateless between sessions; it can be shared and
/// invoked concurrently.
pub struct Poller<F, T> {
    fetcher: F,
    trigger: T,
    config: PollConfig,
}

impl<F: ResultFetcher, T: DownloadTrigger> Poller<F, T> {
    /// Creates a poller with the given fetcher, trigger, and bounds
    pub fn new(fetcher: F, trigger: T, config: PollConfig) -> Self {
        Self {
            fetcher,
            trigger,
            config,
        }
    }

    /// Runs one polling session for `location` until a terminal state
    ///
    /// Cancellation is observed at loop entry and during the backoff
    /// sleep; an in-flight lookup is not interrupted, but its late result
    /// is never acted upon. On a ready result the download trigger is
    /// invoked exactly once; trigger failures are logged and do not change
    /// the outcome.
    pub async fn poll(
        &self,
        location: &str,
        cancel: &CancellationToken,
        mut on_progress: impl FnMut(PollProgress) + Send,
    ) -> PollOutcome {
        let mut attempt: u32 = 0;

        for delay in backoff::delays(self.config.max_attempts, self.config.cap_ms) {
            if cancel.is_cancelled() {
                tracing::debug!(attempt, "polling session cancelled before lookup");
                return PollOutcome::Cancelled;
            }

            match self.fetcher.fetch(location).await {
                Ok(FetchStatus::Ready) => {
                    on_progress(PollProgress {
                        attempt,
                        category: StatusCategory::Ready,
                        message: "result ready".to_string(),
                    });
                    if let Err(e) = self.trigger.trigger(location).await {
                        // not part of the polling contract; the result stays
                        // retrievable at the same location
                        tracing::warn!(error = %e, "download trigger failed");
                    }
                    return PollOutcome::Ready;
                }
                Ok(FetchStatus::Pending) => {
                    on_progress(PollProgress {
                        attempt,
                        category: StatusCategory::Pending,
                        message: "result not ready yet".to_string(),
                    });
                }
                Ok(FetchStatus::Rejected { reason, message }) => {
                    tracing::info!(?reason, attempt, "polling session rejected by upstream");
                    on_progress(PollProgress {
                        attempt,
                        category: StatusCategory::Rejected,
                        message: message.clone(),
                    });
                    return PollOutcome::Rejected { reason, message };
                }
                Ok(FetchStatus::Unexpected { status }) => {
                    tracing::warn!(status, attempt, "unexpected result status, will retry");
                    on_progress(PollProgress {
                        attempt,
                        category: StatusCategory::Transient,
                        message: format!("unexpected status {status}, retrying"),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "result lookup failed, will retry");
                    on_progress(PollProgress {
                        attempt,
                        category: StatusCategory::Transient,
                        message: format!("lookup failed: {e}"),
                    });
                }
            }

            attempt += 1;

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(attempt, "polling session cancelled during backoff");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::info!(
            attempts = attempt,
            "polling session exhausted its attempt budget"
        );
        PollOutcome::TimedOut { attempts: attempt }
    }
}
