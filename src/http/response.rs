//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map validation and upstream failures to client-facing HTTP statuses
//! - Render every failure as a JSON error body
//!
//! # Design Decisions
//! - Upstream timeouts result in 504 Gateway Timeout
//! - Transport failures result in 502 Bad Gateway
//! - Upstream error statuses are relayed as-is
//! - Error bodies never include the API token or the upstream URL

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every way a proxied request can fail.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("No endpoint specified. Use ?endpoint=<your-endpoint>")]
    MissingEndpoint,

    #[error("Endpoint '{0}' not allowed")]
    EndpointNotAllowed(String),

    #[error("Path '{0}' not allowed")]
    PathNotAllowed(String),

    #[error("Feed id '{0}' not allowed")]
    InvalidFeedId(String),

    #[error("No label specified. Use ?label=<your-label>")]
    MissingLabel,

    #[error("Label '{0}' not allowed")]
    InvalidLabel(String),

    #[error("Invalid digest parameters")]
    InvalidDigestParam(String),

    #[error("Request to FreshRSS API timed out")]
    UpstreamTimeout,

    #[error("Request error")]
    UpstreamTransport(String),

    #[error("Upstream returned status {}", .0.as_u16())]
    UpstreamStatus(StatusCode),

    #[error("Failed to decode JSON response")]
    InvalidJson(String),

    #[error("Upstream URL could not be built")]
    InvalidUpstreamUrl,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ProxyError {
    /// The HTTP status returned to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingEndpoint
            | ProxyError::MissingLabel
            | ProxyError::InvalidDigestParam(_) => StatusCode::BAD_REQUEST,

            ProxyError::EndpointNotAllowed(_)
            | ProxyError::PathNotAllowed(_)
            | ProxyError::InvalidFeedId(_)
            | ProxyError::InvalidLabel(_) => StatusCode::FORBIDDEN,

            ProxyError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            ProxyError::UpstreamStatus(status) => *status,

            ProxyError::InvalidJson(_) | ProxyError::InvalidUpstreamUrl => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ProxyError::UpstreamTransport(d)
            | ProxyError::InvalidJson(d)
            | ProxyError::InvalidDigestParam(d) => Some(d.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
