//! Label digest: one upstream stream fetch, paginated locally.
//!
//! # Data Flow
//! ```text
//! GET /digest?label=&n=&page=&limit=
//!     → routing (label → stream/contents/user/-/label/<label>, n)
//!     → upstream (single GET)
//!     → pager.rs (slice items into the requested page)
//! ```

pub mod pager;
pub mod types;

pub use pager::build_digest;
pub use types::{Digest, DigestParams};
