//! HTTP error response handling for the proxy API
//!
//! Validation failures become 400 responses carrying their stable machine
//! code; every other fault class collapses into a generic 500 so internal
//! and upstream diagnostic detail stays in the logs.

use crate::error::{ErrorBody, ValidationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for ValidationError so handlers can return
/// validation failures directly
impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorBody::validation(&self))).into_response()
    }
}

/// Generic 500 response with the constant internal-fault body
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::internal()),
    )
        .into_response()
}
