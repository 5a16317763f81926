//! Upstream FreshRSS client.
//!
//! One shared `reqwest::Client` with the configured timeout. Each call is a
//! single GET; there are no retries and nothing is cached.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::ProxyConfig;
use crate::http::response::ProxyError;
use crate::routing::ResolvedEndpoint;

/// Errors raised while building the client at startup.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("FRESHRSS_API_TOKEN contains characters not allowed in an HTTP header")]
    InvalidToken,
}

/// A fully resolved outbound call. Never carries the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: Url,
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Append the endpoint's subpath to `base_url` segment by segment.
    ///
    /// A trailing `/` on the base never produces a double slash, and each
    /// segment is percent-encoded on its own.
    pub fn build(base_url: &str, endpoint: &ResolvedEndpoint) -> Result<Self, ProxyError> {
        let mut url = Url::parse(base_url).map_err(|_| ProxyError::InvalidUpstreamUrl)?;
        url.path_segments_mut()
            .map_err(|_| ProxyError::InvalidUpstreamUrl)?
            .pop_if_empty()
            .extend(endpoint.subpath.split('/'));

        Ok(Self {
            url,
            query: endpoint.query.clone(),
        })
    }
}

/// Forwards approved requests to the upstream API with the token attached.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
    auth_header: HeaderValue,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, ClientError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("freshproxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut auth_header =
            HeaderValue::from_str(&format!("GoogleLogin auth={}", config.auth_token.expose()))
                .map_err(|_| ClientError::InvalidToken)?;
        auth_header.set_sensitive(true);

        Ok(Self {
            http_client,
            base_url: config.upstream_base_url.clone(),
            auth_header,
        })
    }

    /// GET the endpoint and return the upstream JSON body.
    pub async fn fetch(&self, endpoint: &ResolvedEndpoint) -> Result<Value, ProxyError> {
        let request = UpstreamRequest::build(&self.base_url, endpoint)?;
        tracing::info!(url = %request.url, "Fetching data from upstream");

        let response = self
            .http_client
            .get(request.url)
            .query(&request.query)
            .header(AUTHORIZATION, self.auth_header.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Upstream returned an error status");
            return Err(ProxyError::UpstreamStatus(status));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(error = %e, "JSON decode error");
            ProxyError::InvalidJson(e.to_string())
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> ProxyError {
    if e.is_timeout() {
        tracing::error!("Request to FreshRSS API timed out");
        ProxyError::UpstreamTimeout
    } else {
        let e = e.without_url();
        tracing::error!(error = %e, "Upstream request error");
        ProxyError::UpstreamTransport(e.to_string())
    }
}
