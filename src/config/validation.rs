//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Validation is a pure
//! function run before the config is handed to the server.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;
use crate::routing::matcher::is_safe_subpath;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream base URL {0:?} is invalid: {1}")]
    InvalidBaseUrl(String, String),

    #[error("request timeout must be greater than 0")]
    ZeroTimeout,

    #[error("allowed endpoint {0:?} is not a plain relative subpath")]
    UnsafeEndpoint(String),

    #[error("allowed prefix {0:?} is not a plain relative subpath")]
    UnsafePrefix(String),

    #[error("allowed origin {0:?} is not an http(s) origin")]
    InvalidOrigin(String),

    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.upstream_base_url.is_empty() {
        if let Err(reason) = check_base_url(&config.upstream_base_url) {
            errors.push(ValidationError::InvalidBaseUrl(
                config.upstream_base_url.clone(),
                reason,
            ));
        }
    }

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for endpoint in &config.allowed_endpoints {
        if !is_safe_subpath(endpoint) {
            errors.push(ValidationError::UnsafeEndpoint(endpoint.clone()));
        }
    }

    // Prefixes commonly end in '/' to mark a directory.
    for prefix in &config.allowed_prefixes {
        if !is_safe_subpath(prefix.trim_end_matches('/')) {
            errors.push(ValidationError::UnsafePrefix(prefix.clone()));
        }
    }

    for origin in &config.allowed_origins {
        let valid = Url::parse(origin)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if let Some(addr) = &config.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
