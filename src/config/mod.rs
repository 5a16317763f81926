//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (FRESHRSS_*, FRESHPROXY_*)
//!     → loader.rs (read & parse typed values)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Every variable has a default so an empty environment still boots
//! - Missing credentials are warnings, malformed values are errors

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_from, ConfigError};
pub use schema::{ApiToken, ProxyConfig};
pub use validation::ValidationError;
