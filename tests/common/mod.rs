//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use freshproxy::config::ApiToken;
use freshproxy::{HttpServer, ProxyConfig, Shutdown};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token-5f2c";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Config pointing at `base_url` with a short timeout.
pub fn test_config(base_url: &str) -> ProxyConfig {
    ProxyConfig {
        upstream_base_url: base_url.trim_end_matches('/').to_string(),
        auth_token: ApiToken::new(TOKEN),
        allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        request_timeout_secs: 1,
        ..Default::default()
    }
}

pub fn app(config: ProxyConfig) -> Router {
    HttpServer::new(config).expect("server").router()
}

/// Send a GET through the router; returns status, headers and JSON body.
pub async fn get(app: Router, uri: &str, origin: Option<&str>) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(origin) = origin {
        builder = builder.header("Origin", origin);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

/// A port with nothing listening on it.
pub fn unused_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Serve the proxy on an ephemeral port.
pub async fn start_proxy(
    config: ProxyConfig,
) -> (SocketAddr, Shutdown, JoinHandle<Result<(), std::io::Error>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).expect("server");
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, rx).await });
    (addr, shutdown, handle)
}
