use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Items requested upstream when `n` is absent.
pub const DEFAULT_FETCH: u32 = 50;

/// Upper bound on `n`.
pub const MAX_FETCH: u32 = 1000;

/// Page size when `limit` is absent.
pub const DEFAULT_LIMIT: u32 = 20;

/// Query string of `GET /digest`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DigestParams {
    pub label: Option<String>,
    pub n: Option<u32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl DigestParams {
    /// Number of items to request upstream, in `1..=MAX_FETCH`.
    pub fn fetch_count(&self) -> u32 {
        self.n.unwrap_or(DEFAULT_FETCH).clamp(1, MAX_FETCH)
    }

    /// 1-based page number; `0` is treated as the first page.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, never larger than what was fetched.
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, self.fetch_count())
    }
}

/// One page of a label's items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub label: String,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub items: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}
