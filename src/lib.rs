//! FreshRSS API proxy library.
//!
//! Injects the FreshRSS API token server-side and exposes a whitelisted,
//! read-only subset of the GReader API to browser clients.

pub mod config;
pub mod digest;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::{HttpServer, ProxyError};
pub use lifecycle::Shutdown;
