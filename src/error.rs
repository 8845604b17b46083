//! Error types for marketing-relay
//!
//! This module provides error handling for the relay, including:
//! - Domain-specific error types (Config, Network, Download, etc.)
//! - Request validation errors with stable machine-readable codes
//! - The wire-level error body returned by the proxy endpoints

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for marketing-relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for marketing-relay
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "upstream.base_url")
        key: Option<String>,
    },

    /// Request body failed shape validation at the proxy boundary
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Network error while talking to the upstream backend
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServer(String),

    /// Result download failed (non-success status, unwritable file, ...)
    #[error("download error: {0}")]
    Download(String),
}

/// Request validation failures detected at the proxy boundary
///
/// These never reach the upstream backend. Each variant maps to a stable
/// machine-readable code via [`ValidationError::code`], which API clients
/// can use for programmatic error handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// CSV first line is not one of the accepted header forms
    #[error("unrecognized CSV header")]
    InvalidHeader,

    /// CSV has a valid header but no data rows
    #[error("CSV contains no data rows")]
    EmptyRows,

    /// CSV data row count exceeds the per-submission limit
    #[error("CSV contains {count} data rows, limit is {limit}")]
    TooManyRows {
        /// Number of non-blank data rows found
        count: usize,
        /// Maximum number of data rows accepted per submission
        limit: usize,
    },

    /// Request body did not decode as a JSON object
    #[error("request body is not a JSON object")]
    InvalidJson,

    /// `seedUserNames` is missing, not an array, or empty
    #[error("seedUserNames must be a non-empty array of strings")]
    InvalidSeed,

    /// A `seedUserNames` element is not a string with non-blank content
    #[error("seedUserNames[{index}] must be a non-blank string")]
    InvalidSeedItem {
        /// Index of the offending element
        index: usize,
    },

    /// `filters` is present but not an object
    #[error("filters must be an object")]
    InvalidFilters,
}

impl ValidationError {
    /// Stable machine-readable code for this validation failure
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidHeader => "INVALID_HEADER",
            ValidationError::EmptyRows => "EMPTY_ROWS",
            ValidationError::TooManyRows { .. } => "TOO_MANY_ROWS",
            ValidationError::InvalidJson => "INVALID_JSON",
            ValidationError::InvalidSeed => "INVALID_SEED",
            ValidationError::InvalidSeedItem { .. } => "INVALID_SEED_ITEM",
            ValidationError::InvalidFilters => "INVALID_FILTERS",
        }
    }
}

/// Error body returned by the proxy endpoints
///
/// Validation failures carry both a human-readable message and a machine
/// code. Internal faults carry only a generic message so neither upstream
/// nor internal diagnostic detail reaches the caller.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": "CSV contains no data rows",
///   "code": "EMPTY_ROWS"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,

    /// Machine-readable error code, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Create an error body for a validation failure
    pub fn validation(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
            code: Some(err.code().to_string()),
        }
    }

    /// Create the generic internal-fault body
    ///
    /// Used for configuration faults, upstream transport failures, and any
    /// unexpected handler error. The message is deliberately constant.
    pub fn internal() -> Self {
        Self {
            error: "internal server error".to_string(),
            code: None,
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a vec of (ValidationError, expected_code) for every variant.
    fn all_validation_variants() -> Vec<(ValidationError, &'static str)> {
        vec![
            (ValidationError::InvalidHeader, "INVALID_HEADER"),
            (ValidationError::EmptyRows, "EMPTY_ROWS"),
            (
                ValidationError::TooManyRows {
                    count: 301,
                    limit: 300,
                },
                "TOO_MANY_ROWS",
            ),
            (ValidationError::InvalidJson, "INVALID_JSON"),
            (ValidationError::InvalidSeed, "INVALID_SEED"),
            (
                ValidationError::InvalidSeedItem { index: 1 },
                "INVALID_SEED_ITEM",
            ),
            (ValidationError::InvalidFilters, "INVALID_FILTERS"),
        ]
    }

    #[test]
    fn every_validation_variant_maps_to_expected_code() {
        for (error, expected_code) in all_validation_variants() {
            assert_eq!(
                error.code(),
                expected_code,
                "variant {error:?} returned unexpected code"
            );
        }
    }

    #[test]
    fn validation_codes_are_unique() {
        let mut codes: Vec<&str> = all_validation_variants()
            .into_iter()
            .map(|(e, _)| e.code())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(
            codes.len(),
            all_validation_variants().len(),
            "every validation failure must have a distinct code"
        );
    }

    #[test]
    fn too_many_rows_message_includes_counts() {
        let err = ValidationError::TooManyRows {
            count: 301,
            limit: 300,
        };
        let msg = err.to_string();
        assert!(msg.contains("301"), "message should contain the row count");
        assert!(msg.contains("300"), "message should contain the limit");
    }

    #[test]
    fn seed_item_message_includes_index() {
        let err = ValidationError::InvalidSeedItem { index: 4 };
        assert!(err.to_string().contains("[4]"));
    }

    #[test]
    fn error_body_validation_carries_code_and_message() {
        let body = ErrorBody::validation(&ValidationError::EmptyRows);
        assert_eq!(body.code.as_deref(), Some("EMPTY_ROWS"));
        assert_eq!(body.error, "CSV contains no data rows");
    }

    #[test]
    fn error_body_internal_has_no_code_and_no_detail() {
        let body = ErrorBody::internal();
        assert_eq!(body.error, "internal server error");
        assert!(body.code.is_none());
    }

    #[test]
    fn error_body_omits_code_in_json_when_none() {
        let json = serde_json::to_value(ErrorBody::internal()).unwrap();
        assert_eq!(json["error"], "internal server error");
        assert!(
            json.get("code").is_none(),
            "code field should be omitted from JSON when None"
        );
    }

    #[test]
    fn error_body_round_trips_through_json() {
        let original = ErrorBody::validation(&ValidationError::InvalidSeedItem { index: 2 });
        let json = serde_json::to_string(&original).unwrap();
        let restored: ErrorBody = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.error, original.error);
        assert_eq!(restored.code, original.code);
    }

    #[test]
    fn validation_error_converts_into_error() {
        let err: Error = ValidationError::InvalidHeader.into();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("unrecognized CSV header"));
    }

    #[test]
    fn config_error_display_includes_message() {
        let err = Error::Config {
            message: "upstream base URL is not configured".to_string(),
            key: Some("upstream.base_url".to_string()),
        };
        assert!(err.to_string().contains("upstream base URL"));
    }
}
