//! Route handlers for the proxy API
//!
//! Handlers are organized by endpoint:
//! - [`dm_list`] — outreach-message list submission
//! - [`leads`] — lead-discovery submission
//! - [`results`] — result polling and retrieval
//! - [`system`] — health and OpenAPI
//!
//! Shared across the submission handlers: upstream 202 responses get their
//! result location re-housed on the proxy origin; every other upstream
//! status passes through verbatim, with no interpretation added.

use crate::api::error_response;
use crate::rewrite::rewrite_result_url;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod dm_list;
mod leads;
mod results;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use dm_list::*;
pub use leads::*;
pub use results::*;
pub use system::*;

// ============================================================================
// Response Types (shared across handlers)
// ============================================================================

/// Accepted-submission response, as issued by the upstream backend
///
/// Documented for the OpenAPI schema. The handlers relay the JSON loosely
/// (rewriting only `resultUrl`) so upstream fields not listed here survive
/// the round trip unchanged.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct JobAccepted {
    /// Opaque job handle
    #[serde(rename = "turnId")]
    pub turn_id: String,

    /// Same-origin result location carrying the bearer token
    #[serde(rename = "resultUrl")]
    pub result_url: String,

    /// Number of submitted rows, when the upstream reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// Upstream batch size, when the upstream reports it
    #[serde(rename = "batchSize", skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
}

// ============================================================================
// Shared relay helpers
// ============================================================================

/// Relays an upstream submission response to the caller
///
/// A 202 gets its `resultUrl` rewritten onto the proxy origin, with the
/// rest of the body untouched. Any other status passes through verbatim.
pub(super) async fn relay_submission(response: reqwest::Response) -> Response {
    if response.status().as_u16() == 202 {
        return match accepted_body(response).await {
            Ok(body) => (StatusCode::ACCEPTED, Json(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "unreadable accepted response from upstream");
                error_response::internal_error()
            }
        };
    }
    passthrough(response).await
}

/// Parses an accepted body and re-houses its result location
async fn accepted_body(response: reqwest::Response) -> crate::Result<Value> {
    let mut body: Value = response.json().await?;
    if let Some(location) = body.get("resultUrl").and_then(Value::as_str) {
        let rewritten = rewrite_result_url(location);
        tracing::debug!(result_url = %rewritten, "rewrote upstream result location");
        body["resultUrl"] = Value::String(rewritten);
    }
    Ok(body)
}

/// Passes an upstream response through verbatim
///
/// The status is preserved; a JSON-declared body relays as JSON and
/// anything else relays as text. A body that cannot be read at all is an
/// upstream transport fault and becomes a generic server error.
pub(super) async fn passthrough(response: reqwest::Response) -> Response {
    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let declared_json = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    match response.text().await {
        Ok(body) if declared_json => match serde_json::from_str::<Value>(&body) {
            Ok(value) => (status, Json(value)).into_response(),
            Err(_) => (status, body).into_response(),
        },
        Ok(body) => (status, body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to read upstream response body");
            error_response::internal_error()
        }
    }
}
