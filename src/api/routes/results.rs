//! Result polling and retrieval handler.

use crate::api::{AppState, error_response};
use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// GET /api/results - Poll for or fetch a job result
///
/// The caller's query string travels to the upstream unmodified; the proxy
/// never inspects or validates the token. Translation is status-driven:
/// 202 relays the pending body, 200 streams the result bytes, 400/410 and
/// everything else pass through.
#[utoipa::path(
    get,
    path = "/api/results",
    tag = "results",
    params(
        ("token" = String, Query, description = "Opaque result token issued at submission")
    ),
    responses(
        (status = 200, description = "Result ready; CSV byte stream", content_type = "text/csv"),
        (status = 202, description = "Result not ready yet"),
        (status = 400, description = "Token missing or not recognized upstream"),
        (status = 410, description = "Token expired or already redeemed"),
        (status = 500, description = "Internal or upstream transport fault", body = crate::error::ErrorBody)
    )
)]
pub async fn fetch_result(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let upstream = match state.upstream() {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::error!(error = %e, "result lookup failed before forwarding");
            return error_response::internal_error();
        }
    };

    let response = match upstream.fetch_result(query.as_deref()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "failed to reach upstream for result lookup");
            return error_response::internal_error();
        }
    };

    match response.status().as_u16() {
        200 => stream_result(response),
        _ => super::passthrough(response).await,
    }
}

/// Relays a ready result as a byte stream
///
/// The upstream's content type and declared filename are preserved. Bytes
/// are forwarded as they arrive rather than buffered; a fault after the
/// stream has started terminates the connection so a truncated download is
/// never mistaken for a complete one.
fn stream_result(response: reqwest::Response) -> Response {
    let mut builder = axum::http::Response::builder().status(StatusCode::OK);

    // header values cross two http-crate versions here, so copy via str
    if let Some(value) = header_str(&response, reqwest::header::CONTENT_TYPE) {
        builder = builder.header(header::CONTENT_TYPE, value);
    }
    if let Some(value) = header_str(&response, reqwest::header::CONTENT_DISPOSITION) {
        builder = builder.header(header::CONTENT_DISPOSITION, value);
    }

    match builder.body(Body::from_stream(response.bytes_stream())) {
        Ok(streaming) => streaming.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to build result stream response");
            error_response::internal_error()
        }
    }
}

fn header_str(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}
