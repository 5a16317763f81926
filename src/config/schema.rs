//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! Values are resolved once at startup (see [`loader`](super::loader)) and
//! never mutated afterwards.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Endpoints forwarded through `/?endpoint=` when nothing else is configured.
pub const DEFAULT_ALLOWED_ENDPOINTS: &[&str] =
    &["subscription/list", "stream/contents", "marker/tag/lists"];

/// Secret FreshRSS API token.
///
/// Formatting never reveals the value; call [`ApiToken::expose`] at the single
/// place the upstream `Authorization` header is built.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Root configuration for the proxy.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Upstream GReader API base, e.g. `https://rss.example.com/api/greader.php`.
    /// Stored without a trailing slash.
    pub upstream_base_url: String,

    /// Token injected into every upstream request.
    pub auth_token: ApiToken,

    /// Exact subpaths accepted by `/?endpoint=`.
    pub allowed_endpoints: BTreeSet<String>,

    /// Subpath prefixes accepted by `/?endpoint=`.
    pub allowed_prefixes: Vec<String>,

    /// Origins that receive CORS allow headers.
    pub allowed_origins: Vec<String>,

    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Verbose logging.
    pub debug: bool,

    /// Upstream request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Prometheus listener address; metrics exporter disabled when `None`.
    pub metrics_address: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: String::new(),
            auth_token: ApiToken::default(),
            allowed_endpoints: DEFAULT_ALLOWED_ENDPOINTS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            allowed_prefixes: Vec::new(),
            allowed_origins: Vec::new(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
            request_timeout_secs: 10,
            metrics_address: None,
        }
    }
}

impl ProxyConfig {
    /// Upstream request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The `host:port` pair to bind.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Non-fatal problems worth logging at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.auth_token.is_empty() || self.upstream_base_url.is_empty() {
            warnings.push(
                "Either FRESHRSS_API_TOKEN or FRESHRSS_BASE_URL is missing. \
                 Proxy may not function correctly."
                    .to_string(),
            );
        }
        if self.allowed_origins.is_empty() {
            warnings.push(
                "FRESHPROXY_ALLOWED_ORIGINS is empty; browsers will not receive CORS headers"
                    .to_string(),
            );
        }
        warnings
    }
}
