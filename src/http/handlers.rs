//! Route handlers: validate, forward, translate.

use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::digest::{build_digest, DigestParams};
use crate::http::request::request_id;
use crate::http::response::ProxyError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::router::{resolve_feed, resolve_label, resolve_subscriptions};
use crate::routing::ResolvedEndpoint;

/// `GET /?endpoint=<name>`: whitelisted pass-through.
pub async fn proxy_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let result = match state.router.resolve_endpoint(query) {
        Ok(endpoint) => forward(&state, &request_id, &endpoint).await,
        Err(e) => Err(e),
    };
    finish("endpoint", &request_id, start, result.map(Json))
}

/// `GET /subscriptions`.
pub async fn subscriptions(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let result = forward(&state, &request_id, &resolve_subscriptions()).await;
    finish("subscriptions", &request_id, start, result.map(Json))
}

/// `GET /feed/{id}`.
pub async fn feed_contents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let result = match resolve_feed(&id, query) {
        Ok(endpoint) => forward(&state, &request_id, &endpoint).await,
        Err(e) => Err(e),
    };
    finish("feed", &request_id, start, result.map(Json))
}

/// `GET /digest?label=&n=&page=&limit=`.
pub async fn digest(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<DigestParams>, QueryRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            let result: Result<Json<Value>, _> =
                Err(ProxyError::InvalidDigestParam(rejection.body_text()));
            return finish("digest", &request_id, start, result);
        }
    };
    let result = match resolve_label(params.label.as_deref(), params.fetch_count()) {
        Ok(endpoint) => forward(&state, &request_id, &endpoint)
            .await
            .map(|body| {
                let label = params.label.as_deref().unwrap_or_default().trim();
                build_digest(label, &params, body)
            }),
        Err(e) => Err(e),
    };
    finish("digest", &request_id, start, result.map(Json))
}

/// `GET /health`: liveness only, never touches the upstream.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Anything without a dedicated route is refused.
pub async fn not_allowed(headers: HeaderMap, uri: Uri) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let result: Result<Json<Value>, _> = Err(ProxyError::PathNotAllowed(uri.path().to_string()));
    finish("fallback", &request_id, start, result)
}

async fn forward(
    state: &AppState,
    request_id: &str,
    endpoint: &ResolvedEndpoint,
) -> Result<Value, ProxyError> {
    tracing::debug!(
        request_id = %request_id,
        subpath = %endpoint.subpath,
        "Forwarding request"
    );
    state.upstream.fetch(endpoint).await
}

fn finish<T: IntoResponse>(
    route: &'static str,
    request_id: &str,
    start: Instant,
    result: Result<T, ProxyError>,
) -> Response {
    let response = match result {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            if e.status_code().is_client_error() {
                tracing::warn!(request_id = %request_id, route, error = %e, "Request rejected");
            } else {
                tracing::error!(request_id = %request_id, route, error = %e, "Request failed");
            }
            e.into_response()
        }
    };
    metrics::record_request(route, response.status().as_u16(), start);
    response
}
