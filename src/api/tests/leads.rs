use super::*;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const SUBMIT_URI: &str = "/api/marketing/generate_leads";
const UPSTREAM_PATH: &str = "/marketing/generate_leads";

#[tokio::test]
async fn valid_payload_is_forwarded_and_result_location_rewritten() {
    let (app, server) = proxied_app().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .and(body_json(serde_json::json!({
            "seedUserNames": ["alice", "bob"]
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "turnId": "lead-1",
            "resultUrl": format!("{}/results?token=tok-7", server.uri()),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .oneshot(post_request(
            SUBMIT_URI,
            "application/json",
            r#"{"seedUserNames":["alice","bob"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = response_json(response).await;
    assert_eq!(body["turnId"], "lead-1");
    assert_eq!(body["resultUrl"], "/api/results?token=tok-7");
}

#[tokio::test]
async fn filters_and_unknown_members_are_forwarded_verbatim() {
    let (app, server) = proxied_app().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .and(body_json(serde_json::json!({
            "seedUserNames": ["a"],
            "filters": {"minFollowers": 100},
            "campaign": "spring"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "turnId": "lead-2",
            "resultUrl": "/results?token=t",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app
        .oneshot(post_request(
            SUBMIT_URI,
            "application/json",
            r#"{"seedUserNames":["a"],"filters":{"minFollowers":100},"campaign":"spring"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn blank_seed_item_is_rejected_without_an_upstream_call() {
    let (app, server) = proxied_app().await;

    let response = app
        .oneshot(post_request(
            SUBMIT_URI,
            "application/json",
            r#"{"seedUserNames":["a"," "]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "INVALID_SEED_ITEM");

    assert!(
        server.received_requests().await.unwrap().is_empty(),
        "validation failures must never reach the upstream"
    );
}

#[tokio::test]
async fn malformed_json_is_rejected_with_invalid_json() {
    let (app, server) = proxied_app().await;

    let response = app
        .oneshot(post_request(SUBMIT_URI, "application/json", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_seed_list_is_rejected_with_invalid_seed() {
    let (app, _server) = proxied_app().await;

    let response = app
        .oneshot(post_request(SUBMIT_URI, "application/json", r#"{"filters":{}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "INVALID_SEED");
}

#[tokio::test]
async fn non_object_filters_is_rejected_with_invalid_filters() {
    let (app, _server) = proxied_app().await;

    let response = app
        .oneshot(post_request(
            SUBMIT_URI,
            "application/json",
            r#"{"seedUserNames":["a"],"filters":"all"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "INVALID_FILTERS");
}

#[tokio::test]
async fn upstream_rejection_passes_through_verbatim() {
    let (app, server) = proxied_app().await;

    Mock::given(method("POST"))
        .and(path(UPSTREAM_PATH))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(serde_json::json!({"error": "unknown seed"})),
        )
        .mount(&server)
        .await;

    let response = app
        .oneshot(post_request(
            SUBMIT_URI,
            "application/json",
            r#"{"seedUserNames":["ghost"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 422);
    let body = response_json(response).await;
    assert_eq!(body["error"], "unknown seed");
}

#[tokio::test]
async fn missing_upstream_configuration_fails_closed() {
    let app = unconfigured_app();

    let response = app
        .oneshot(post_request(
            SUBMIT_URI,
            "application/json",
            r#"{"seedUserNames":["a"]}"#,
        ))
        .await
        .unwrap();

    assert_internal_error(response).await;
}
