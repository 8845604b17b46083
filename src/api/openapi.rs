//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the proxy API using
//! utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the proxy API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "marketing-relay API",
        version = "0.1.0",
        description = "Origin-concealing proxy for asynchronous marketing-job submission and result retrieval",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8787", description = "Local development server")
    ),
    paths(
        // Job submission
        crate::api::routes::submit_dm_list,
        crate::api::routes::submit_leads,

        // Results
        crate::api::routes::fetch_result,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::api::routes::JobAccepted,
        crate::error::ErrorBody,
        crate::config::Config,
        crate::config::UpstreamConfig,
        crate::config::ApiConfig,
        crate::config::PollConfig,
    )),
    tags(
        (name = "marketing", description = "Job submission - Validate and forward outreach and lead-discovery jobs"),
        (name = "results", description = "Results - Poll for and retrieve finished job output"),
        (name = "system", description = "System endpoints - Health check and OpenAPI spec"),
    )
)]
pub struct ApiDoc;
