//! Request validation and upstream subpath resolution.
//!
//! # Responsibilities
//! - Approve or reject `?endpoint=` values against the configured whitelist
//! - Map the fixed routes (`/subscriptions`, `/feed/{id}`, `/digest`) onto
//!   their upstream subpaths
//! - Return the resolved endpoint or an explicit rejection
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Pure: no I/O, so a rejection guarantees nothing is forwarded

use crate::config::ProxyConfig;
use crate::http::response::ProxyError;
use crate::routing::matcher::{is_safe_subpath, AnyMatcher, ExactMatcher, Matcher, PrefixMatcher};

/// Upstream subpath listing the user's subscriptions.
pub const SUBSCRIPTIONS_SUBPATH: &str = "subscription/list";

/// Upstream subpath prefix for a single feed's items.
pub const FEED_CONTENTS_PREFIX: &str = "stream/contents/feed/";

/// Upstream subpath prefix for a label's items.
pub const LABEL_CONTENTS_PREFIX: &str = "stream/contents/user/-/label/";

/// An approved upstream call: the subpath below the base URL and the query
/// pairs to forward with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub subpath: String,
    pub query: Vec<(String, String)>,
}

impl ResolvedEndpoint {
    pub fn new(subpath: impl Into<String>) -> Self {
        Self {
            subpath: subpath.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// Compiled whitelist for the `?endpoint=` route.
#[derive(Debug)]
pub struct Router {
    whitelist: AnyMatcher,
}

impl Router {
    /// Compile the whitelist from configuration.
    pub fn from_config(config: &ProxyConfig) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> =
            vec![Box::new(ExactMatcher::new(config.allowed_endpoints.iter().cloned()))];
        for prefix in &config.allowed_prefixes {
            matchers.push(Box::new(PrefixMatcher::new(prefix.clone())));
        }
        Self {
            whitelist: AnyMatcher::new(matchers),
        }
    }

    /// Resolve a `GET /?endpoint=<name>&...` request.
    ///
    /// `query` holds the inbound query pairs; every pair except `endpoint`
    /// is forwarded upstream.
    pub fn resolve_endpoint(
        &self,
        query: Vec<(String, String)>,
    ) -> Result<ResolvedEndpoint, ProxyError> {
        let endpoint = query
            .iter()
            .find(|(k, _)| k == "endpoint")
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
            .ok_or(ProxyError::MissingEndpoint)?;

        if !is_safe_subpath(&endpoint) || !self.whitelist.matches(&endpoint) {
            return Err(ProxyError::EndpointNotAllowed(endpoint));
        }

        let forwarded = query.into_iter().filter(|(k, _)| k != "endpoint").collect();
        Ok(ResolvedEndpoint::new(endpoint).with_query(forwarded))
    }
}

/// `GET /subscriptions`.
pub fn resolve_subscriptions() -> ResolvedEndpoint {
    ResolvedEndpoint::new(SUBSCRIPTIONS_SUBPATH)
        .with_query(vec![("output".to_string(), "json".to_string())])
}

/// `GET /feed/{id}`; the inbound query is forwarded verbatim.
pub fn resolve_feed(
    id: &str,
    query: Vec<(String, String)>,
) -> Result<ResolvedEndpoint, ProxyError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ProxyError::InvalidFeedId(id.to_string()));
    }
    Ok(ResolvedEndpoint::new(format!("{FEED_CONTENTS_PREFIX}{id}")).with_query(query))
}

/// `GET /digest?label=...`; `n` is the number of items requested upstream.
pub fn resolve_label(label: Option<&str>, n: u32) -> Result<ResolvedEndpoint, ProxyError> {
    let label = label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or(ProxyError::MissingLabel)?;

    let subpath = format!("{LABEL_CONTENTS_PREFIX}{label}");
    if label.contains('/') || !is_safe_subpath(&subpath) {
        return Err(ProxyError::InvalidLabel(label.to_string()));
    }

    Ok(ResolvedEndpoint::new(subpath).with_query(vec![
        ("n".to_string(), n.to_string()),
        ("output".to_string(), "json".to_string()),
    ]))
}
