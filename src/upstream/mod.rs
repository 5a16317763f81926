//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedEndpoint (from routing)
//!     → client.rs (build URL, attach token, GET with timeout)
//!     → Ok(JSON body) | ProxyError (504 / 502 / relayed status / 500)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: a failed call is reported to the client immediately
//! - The token lives only in a sensitive header value

pub mod client;

pub use client::{ClientError, UpstreamClient, UpstreamRequest};
