//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{ApiToken, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_API_TOKEN: &str = "FRESHRSS_API_TOKEN";
pub const ENV_BASE_URL: &str = "FRESHRSS_BASE_URL";
pub const ENV_ALLOWED_ENDPOINTS: &str = "FRESHPROXY_ALLOWED_ENDPOINTS";
pub const ENV_ALLOWED_PREFIXES: &str = "FRESHPROXY_ALLOWED_PREFIXES";
pub const ENV_ALLOWED_ORIGINS: &str = "FRESHPROXY_ALLOWED_ORIGINS";
pub const ENV_HOST: &str = "FRESHPROXY_HOST";
pub const ENV_PORT: &str = "FRESHPROXY_PORT";
pub const ENV_DEBUG: &str = "FRESHPROXY_DEBUG";
pub const ENV_REQUEST_TIMEOUT: &str = "FRESHPROXY_REQUEST_TIMEOUT";
pub const ENV_METRICS_ADDRESS: &str = "FRESHPROXY_METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_config() -> Result<ProxyConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load and validate configuration from an arbitrary variable source.
pub fn load_config_from<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = parse_config(lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_config<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ProxyConfig::default();

    if let Some(token) = lookup(ENV_API_TOKEN) {
        config.auth_token = ApiToken::new(token.trim());
    }
    if let Some(base) = lookup(ENV_BASE_URL) {
        config.upstream_base_url = base.trim().trim_end_matches('/').to_string();
    }
    if let Some(endpoints) = lookup(ENV_ALLOWED_ENDPOINTS) {
        config.allowed_endpoints = split_list(&endpoints).into_iter().collect();
    }
    if let Some(prefixes) = lookup(ENV_ALLOWED_PREFIXES) {
        config.allowed_prefixes = split_list(&prefixes);
    }
    if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
        config.allowed_origins = split_list(&origins);
    }
    if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
        config.host = host.trim().to_string();
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidValue {
                var: ENV_PORT,
                value: port.clone(),
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(debug) = lookup(ENV_DEBUG) {
        config.debug = parse_bool(&debug).ok_or_else(|| ConfigError::InvalidValue {
            var: ENV_DEBUG,
            value: debug.clone(),
            reason: "expected true/false".to_string(),
        })?;
    }
    if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT) {
        config.request_timeout_secs =
            timeout
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    var: ENV_REQUEST_TIMEOUT,
                    value: timeout.clone(),
                    reason: e.to_string(),
                })?;
    }
    config.metrics_address = lookup(ENV_METRICS_ADDRESS)
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    Ok(config)
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = load_config_from(env(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(!config.debug);
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.metrics_address.is_none());
        assert!(!config.warnings().is_empty());
    }

    #[test]
    fn test_allowed_origins_parsing() {
        let config = load_config_from(env(&[(
            ENV_ALLOWED_ORIGINS,
            "http://localhost:3000, , https://test.com, ,https://proxy.example.com",
        )]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec![
                "http://localhost:3000",
                "https://test.com",
                "https://proxy.example.com",
            ]
        );
    }

    #[test]
    fn test_full_environment() {
        let config = load_config_from(env(&[
            (ENV_API_TOKEN, "secret"),
            (ENV_BASE_URL, "https://rss.example.com/api/greader.php/"),
            (ENV_ALLOWED_ENDPOINTS, "subscription/list"),
            (ENV_ALLOWED_PREFIXES, "stream/contents/feed/, marker/"),
            (ENV_HOST, "127.0.0.1"),
            (ENV_PORT, "9001"),
            (ENV_DEBUG, "True"),
            (ENV_REQUEST_TIMEOUT, "3"),
            (ENV_METRICS_ADDRESS, "127.0.0.1:9100"),
        ]))
        .unwrap();

        assert_eq!(
            config.upstream_base_url,
            "https://rss.example.com/api/greader.php"
        );
        assert_eq!(config.auth_token.expose(), "secret");
        assert_eq!(config.allowed_endpoints.len(), 1);
        assert_eq!(
            config.allowed_prefixes,
            vec!["stream/contents/feed/", "marker/"]
        );
        assert_eq!(config.listen_addr(), "127.0.0.1:9001");
        assert!(config.debug);
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.metrics_address.as_deref(), Some("127.0.0.1:9100"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = load_config_from(env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_PORT, .. }));
    }

    #[test]
    fn test_invalid_debug_is_rejected() {
        let err = load_config_from(env(&[(ENV_DEBUG, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_DEBUG, .. }));
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let err = load_config_from(env(&[(ENV_REQUEST_TIMEOUT, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_errors_never_echo_the_token() {
        let err = load_config_from(env(&[
            (ENV_API_TOKEN, "super-secret-token"),
            (ENV_BASE_URL, "ftp://nope"),
        ]))
        .unwrap_err();
        assert!(!err.to_string().contains("super-secret-token"));
    }
}
