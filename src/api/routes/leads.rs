//! Lead-discovery submission handler.

use crate::api::{AppState, error_response};
use crate::validate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

/// POST /api/marketing/generate_leads - Submit lead-discovery seeds
///
/// The body is parsed and validated here rather than through a typed
/// extractor so malformed JSON gets the proxy's own `INVALID_JSON` code.
/// The forwarded payload is a re-serialization of exactly the object that
/// validated, `filters` included.
#[utoipa::path(
    post,
    path = "/api/marketing/generate_leads",
    tag = "marketing",
    request_body(content = String, description = "JSON object with seedUserNames and optional filters", content_type = "application/json"),
    responses(
        (status = 202, description = "Job accepted; resultUrl is same-origin", body = super::JobAccepted),
        (status = 400, description = "Payload failed shape validation", body = crate::error::ErrorBody),
        (status = 500, description = "Internal or upstream transport fault", body = crate::error::ErrorBody)
    )
)]
pub async fn submit_leads(State(state): State<AppState>, body: String) -> Response {
    let payload = match validate::validate_leads(&body) {
        Ok(payload) => payload,
        Err(e) => return e.into_response(),
    };

    let upstream = match state.upstream() {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(error = %e, "leads submission failed before forwarding");
            return error_response::internal_error();
        }
    };

    match upstream.submit_leads(&payload).await {
        Ok(response) => super::relay_submission(response).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to forward leads submission");
            error_response::internal_error()
        }
    }
}
