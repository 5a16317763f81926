//! Routing subsystem: decides whether a request may reach the upstream.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (whitelist or fixed-route lookup)
//!     → matcher.rs (exact / prefix / path-safety checks)
//!     → Return: ResolvedEndpoint or ProxyError (400/403)
//!
//! Whitelist Compilation (at startup):
//!     allowed_endpoints + allowed_prefixes
//!     → Compile matchers
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Whitelist compiled at startup, immutable at runtime
//! - Deterministic: same input always resolves to the same subpath
//! - Rejection happens before any network activity

pub mod matcher;
pub mod router;

pub use router::{ResolvedEndpoint, Router};
