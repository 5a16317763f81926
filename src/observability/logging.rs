//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the level follows `FRESHPROXY_DEBUG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives when `RUST_LOG` is unset.
pub fn default_directives(debug: bool) -> &'static str {
    if debug {
        "freshproxy=debug,tower_http=debug"
    } else {
        "freshproxy=info,tower_http=info"
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(debug: bool) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(debug).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
