//! CORS origin allow-list.
//!
//! Only origins listed in `FRESHPROXY_ALLOWED_ORIGINS` receive
//! `Access-Control-Allow-*` headers. An empty list grants nothing.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Create a CORS layer with the specified allowed origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring origin that is not a valid header value");
                None
            }
        })
        .collect();

    tracing::debug!(origins = ?allowed_origins, "CORS allow-list");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
