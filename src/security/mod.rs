//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin allow-list, preflight handling)
//!     → routing (endpoint whitelist)
//! ```
//!
//! # Design Decisions
//! - Fail closed: unknown origins get no allow headers
//! - No trust in client input; the token is added server-side only

pub mod cors;

pub use cors::cors_layer;
