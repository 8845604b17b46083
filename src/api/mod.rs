//! Proxy API server module
//!
//! Browser-facing surface of the relay: three stateless endpoints that
//! validate, forward, and translate traffic for the upstream job backend
//! without ever revealing its network location, plus health and OpenAPI
//! system routes.

use crate::{Config, Result};
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the proxy router with all route definitions
///
/// # Routes
///
/// ## Job submission
/// - `POST /api/marketing/generate_dm_list` - Submit an outreach CSV
/// - `POST /api/marketing/generate_leads` - Submit lead-discovery seeds
///
/// ## Results
/// - `GET /api/results` - Poll for or fetch a job result
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive documentation (if enabled)
pub fn create_router(config: Arc<Config>) -> Router {
    let state = AppState::new(config.clone());

    let router = Router::new()
        .route(
            "/api/marketing/generate_dm_list",
            post(routes::submit_dm_list),
        )
        .route(
            "/api/marketing/generate_leads",
            post(routes::submit_leads),
        )
        .route("/api/results", get(routes::fetch_result))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // SwaggerUi serves its own copy of the spec at a distinct path so the
    // /openapi.json route above is untouched.
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state);

    // Apply the permissive CORS layer the browser contract requires
    if config.api.cors_enabled {
        router.layer(build_cors_layer(config.api.preflight_max_age_secs))
    } else {
        router
    }
}

/// Build the permissive CORS layer
///
/// Any origin may call the proxy with `GET`, `POST`, or `OPTIONS` and a
/// `Content-Type` header. Preflight probes are answered by the layer
/// itself with an empty success response and cached for `max_age_secs`;
/// no request body processing happens for those probes.
fn build_cors_layer(max_age_secs: u64) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(max_age_secs))
}

/// Start the proxy server on the configured bind address.
///
/// Binds a TCP listener and serves the router until a termination signal
/// arrives. A missing upstream base URL does not prevent startup; affected
/// endpoints fail closed per request instead.
///
/// # Example
///
/// ```no_run
/// use marketing_relay::Config;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
///
/// // Start the proxy server (blocks until shutdown)
/// marketing_relay::api::start_api_server(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(config: Arc<Config>) -> Result<()> {
    let bind_address = config.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting proxy server"
    );

    let app = create_router(config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "Proxy server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::wait_for_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServer(e.to_string()))?;

    tracing::info!("Proxy server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
