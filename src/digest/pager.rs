//! Local pagination over a label's stream contents.

use serde_json::Value;

use crate::digest::types::{Digest, DigestParams};

/// Slice the upstream `items` array into the requested page.
///
/// A missing or non-array `items` field yields an empty digest.
pub fn build_digest(label: &str, params: &DigestParams, mut upstream: Value) -> Digest {
    let items = match upstream.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let continuation = upstream
        .get("continuation")
        .and_then(Value::as_str)
        .map(String::from);

    let page = params.page();
    let limit = params.limit();
    let total = items.len();
    let start = (page as usize - 1).saturating_mul(limit as usize);

    let items = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();

    Digest {
        label: label.to_string(),
        page,
        limit,
        total,
        items,
        continuation,
    }
}
