//! Outreach-message list submission handler.

use crate::api::{AppState, error_response};
use crate::validate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

/// POST /api/marketing/generate_dm_list - Submit an outreach CSV
///
/// The body's declared content type is deliberately not enforced; any body
/// that validates as an outreach CSV is accepted.
#[utoipa::path(
    post,
    path = "/api/marketing/generate_dm_list",
    tag = "marketing",
    request_body(content = String, description = "CSV with 1-300 data rows under an accepted header", content_type = "text/csv"),
    responses(
        (status = 202, description = "Job accepted; resultUrl is same-origin", body = super::JobAccepted),
        (status = 400, description = "CSV failed shape validation", body = crate::error::ErrorBody),
        (status = 500, description = "Internal or upstream transport fault", body = crate::error::ErrorBody)
    )
)]
pub async fn submit_dm_list(State(state): State<AppState>, body: String) -> Response {
    let csv = match validate::validate_outreach_csv(&body) {
        Ok(csv) => csv,
        Err(e) => return e.into_response(),
    };
    if csv.expanded {
        tracing::debug!(rows = csv.data_rows, "expanded legacy two-column submission");
    }

    let upstream = match state.upstream() {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(error = %e, "outreach submission failed before forwarding");
            return error_response::internal_error();
        }
    };

    match upstream.submit_dm_list(csv.body).await {
        Ok(response) => super::relay_submission(response).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to forward outreach submission");
            error_response::internal_error()
        }
    }
}
