//! Endpoint matching logic.
//!
//! # Responsibilities
//! - Match a requested upstream subpath exactly against the whitelist
//! - Match a requested upstream subpath against whitelisted prefixes
//! - Reject subpaths that could escape the upstream base path
//!
//! # Design Decisions
//! - Matching is case-sensitive (upstream paths are)
//! - Safety check runs before any matcher, so a prefix can never admit `..`
//! - No regex to guarantee O(n) matching

use std::collections::BTreeSet;

/// Trait for matching a requested endpoint against a whitelist rule.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the endpoint is admitted by this rule.
    fn matches(&self, endpoint: &str) -> bool;
}

/// Admits endpoints present in a fixed set.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    endpoints: BTreeSet<String>,
}

impl ExactMatcher {
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints.into_iter().map(Into::into).collect(),
        }
    }
}

impl Matcher for ExactMatcher {
    fn matches(&self, endpoint: &str) -> bool {
        self.endpoints.contains(endpoint)
    }
}

/// Admits endpoints starting with a prefix.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PrefixMatcher {
    fn matches(&self, endpoint: &str) -> bool {
        endpoint.starts_with(&self.prefix)
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, endpoint: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(endpoint))
    }
}

/// True if `subpath` is a plain relative path that stays below the base URL.
///
/// Rejects leading `/`, empty `.` and `..` segments, and characters that
/// would change the meaning of the URL once appended (`\ ? # %`, controls).
pub fn is_safe_subpath(subpath: &str) -> bool {
    if subpath.is_empty() || subpath.starts_with('/') {
        return false;
    }
    if subpath
        .chars()
        .any(|c| c.is_control() || matches!(c, '\\' | '?' | '#' | '%'))
    {
        return false;
    }
    subpath
        .split('/')
        .all(|segment| !matches!(segment, "" | "." | ".."))
}
