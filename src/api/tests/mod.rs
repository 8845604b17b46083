use super::*;
use crate::Config;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::MockServer;

mod leads;

/// Router wired to a wiremock upstream
async fn proxied_app() -> (Router, MockServer) {
    let server = MockServer::start().await;
    let mut config = Config::default();
    config.upstream.base_url = Some(server.uri());
    (create_router(Arc::new(config)), server)
}

/// Router with no upstream configured
fn unconfigured_app() -> Router {
    create_router(Arc::new(Config::default()))
}

/// Build a POST request with the given content type and body
fn post_request(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON
async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read a response body as text
async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Assert the generic internal-fault contract: 500, constant message, no code
async fn assert_internal_error(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"], "internal server error");
    assert!(
        body.get("code").is_none(),
        "internal faults must not leak a code or detail"
    );
}

#[tokio::test]
async fn preflight_probe_is_answered_with_an_empty_success() {
    let (app, _server) = proxied_app().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/marketing/generate_dm_list")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(
        response.status().is_success(),
        "preflight must succeed, got {}",
        response.status()
    );

    let headers = response.headers().clone();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*"),
        "any origin must be allowed"
    );
    let methods = headers
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(methods.contains("POST"), "allow-methods was {methods:?}");
    assert!(methods.contains("GET"));
    assert!(
        headers.contains_key("access-control-max-age"),
        "preflight response must be cacheable"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty(), "preflight must carry no body");
}

#[tokio::test]
async fn simple_requests_carry_the_cors_header() {
    let (app, _server) = proxied_app().await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present on simple responses too"
    );
}

#[tokio::test]
async fn health_endpoint_reports_ok_and_version() {
    let (app, _server) = proxied_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let (app, _server) = proxied_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["paths"].get("/api/results").is_some());
}

#[tokio::test]
async fn swagger_ui_is_absent_unless_enabled() {
    let (app, _server) = proxied_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
