//! End-to-end behavior of every route against a fake FreshRSS upstream.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

use common::{app, get, test_config, unused_port, ALLOWED_ORIGIN, TOKEN};

const AUTH: &str = "GoogleLogin auth=test-token-5f2c";

async fn upstream() -> (MockServer, String) {
    let server = MockServer::start().await;
    let base = format!("{}/api/greader.php", server.uri());
    (server, base)
}

async fn expect_no_calls(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn whitelisted_endpoint_is_forwarded_verbatim() {
    let server = MockServer::start().await;
    let base = format!("{}/greader.php", server.uri());
    Mock::given(method("GET"))
        .and(path("/greader.php/subscription/list"))
        .and(header("Authorization", AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&base);
    config.allowed_endpoints = ["subscription/list".to_string()].into();

    let (status, _, body) = get(app(config), "/?endpoint=subscription/list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "items": [] }));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/greader.php/subscription/list");
}

#[tokio::test]
async fn endpoint_query_params_are_forwarded() {
    let (server, base) = upstream().await;
    Mock::given(path("/api/greader.php/stream/contents"))
        .and(query_param("n", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [1] })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(
        app(test_config(&base)),
        "/?endpoint=stream/contents&n=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([1]));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("n=5"));
}

#[tokio::test]
async fn prefix_whitelist_admits_subpaths() {
    let (server, base) = upstream().await;
    Mock::given(path("/api/greader.php/stream/contents/feed/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "feed/12" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&base);
    config.allowed_prefixes = vec!["stream/contents/feed/".to_string()];

    let (status, _, body) =
        get(app(config), "/?endpoint=stream/contents/feed/12", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "feed/12");
}

#[tokio::test]
async fn disallowed_endpoints_are_rejected_without_upstream_call() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let mut config = test_config(&base);
    config.allowed_prefixes = vec!["stream/contents/".to_string()];

    for uri in [
        "/?endpoint=user-info",
        "/?endpoint=/subscription/list",
        "/?endpoint=stream/contents/../../../etc/passwd",
        "/?endpoint=stream/contents//feed",
    ] {
        let (status, _, body) = get(app(config.clone()), uri, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("not allowed"));
    }
}

#[tokio::test]
async fn missing_endpoint_is_bad_request() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let (status, _, body) = get(app(test_config(&base)), "/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "No endpoint specified. Use ?endpoint=<your-endpoint>"
    );
}

#[tokio::test]
async fn subscriptions_route() {
    let (server, base) = upstream().await;
    Mock::given(method("GET"))
        .and(path("/api/greader.php/subscription/list"))
        .and(query_param("output", "json"))
        .and(header("Authorization", AUTH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "subscriptions": ["Feed1", "Feed2"] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, headers, body) = get(app(test_config(&base)), "/subscriptions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscriptions"], json!(["Feed1", "Feed2"]));
    assert!(headers.get("x-request-id").is_some());
}

#[tokio::test]
async fn feed_route_forwards_query() {
    let (server, base) = upstream().await;
    Mock::given(path("/api/greader.php/stream/contents/feed/40"))
        .and(query_param("n", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "feed": ["Feed1"] })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(app(test_config(&base)), "/feed/40?n=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feed"], json!(["Feed1"]));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("n=1"));
}

#[tokio::test]
async fn feed_route_rejects_traversal() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let (status, _, _) = get(app(test_config(&base)), "/feed/..%2F..%2Fadmin", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_paths_are_forbidden() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let (status, _, body) = get(app(test_config(&base)), "/admin/config", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Path '/admin/config' not allowed");
}

#[tokio::test]
async fn digest_paginates_label_items() {
    let (server, base) = upstream().await;
    let items: Vec<_> = (0..12).map(|i| json!({ "id": i })).collect();
    Mock::given(path("/api/greader.php/stream/contents/user/-/label/Tech"))
        .and(query_param("n", "12"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _, body) = get(
        app(test_config(&base)),
        "/digest?label=Tech&n=12&page=2&limit=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Tech");
    assert_eq!(body["total"], 12);
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["items"][0]["id"], 5);
}

#[tokio::test]
async fn digest_requires_label() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let (status, _, _) = get(app(test_config(&base)), "/digest?n=5", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_timeout_maps_to_gateway_timeout() {
    let (server, base) = upstream().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let (status, _, body) = get(app(test_config(&base)), "/subscriptions", None).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn upstream_connection_error_maps_to_bad_gateway() {
    let base = format!("http://127.0.0.1:{}/api/greader.php", unused_port());

    let (status, _, body) = get(app(test_config(&base)), "/subscriptions", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Request error");
    assert!(!body.to_string().contains(TOKEN));
    assert!(!body.to_string().contains("127.0.0.1"));
}

#[tokio::test]
async fn upstream_error_status_is_relayed() {
    let (server, base) = upstream().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized!"))
        .mount(&server)
        .await;

    let (status, _, body) = get(app(test_config(&base)), "/subscriptions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Upstream returned status 401");
    assert!(!body.to_string().contains(TOKEN));
}

#[tokio::test]
async fn non_json_upstream_body_is_internal_error() {
    let (server, base) = upstream().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let (status, _, body) = get(app(test_config(&base)), "/subscriptions", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to decode JSON response");
}

#[tokio::test]
async fn cors_headers_only_for_allowed_origins() {
    let (server, base) = upstream().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let (_, headers, _) = get(
        app(test_config(&base)),
        "/subscriptions",
        Some(ALLOWED_ORIGIN),
    )
    .await;
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        ALLOWED_ORIGIN
    );

    let (status, headers, _) = get(
        app(test_config(&base)),
        "/subscriptions",
        Some("https://evil.example.net"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn cors_applies_to_rejections_too() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let (status, headers, _) = get(
        app(test_config(&base)),
        "/?endpoint=user-info",
        Some(ALLOWED_ORIGIN),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn health_does_not_touch_upstream() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    let (status, _, body) = get(app(test_config(&base)), "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn digest_rejects_malformed_numbers_as_json() {
    let (server, base) = upstream().await;
    expect_no_calls(&server).await;

    for uri in [
        "/digest?label=Tech&n=abc",
        "/digest?label=Tech&page=-1",
        "/digest?label=Tech&limit=99999999999",
    ] {
        let (status, headers, body) = get(app(test_config(&base)), uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(body["error"], "Invalid digest parameters");
        assert!(body["details"].as_str().is_some());
    }
}
