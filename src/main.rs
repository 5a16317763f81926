//! freshproxy
//!
//! A token-injecting proxy in front of a FreshRSS GReader API.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    FRESHPROXY                    │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!   ──────────────────┼─▶│  cors +  │──▶│ routing  │──▶│  upstream   │───┼──▶ FreshRSS
//!                     │  │ req. id  │   │whitelist │   │ client+token│   │
//!                     │  └──────────┘   └────┬─────┘   └──────┬──────┘   │
//!   Client Response   │                     │ 400/403         │ 2xx/502/504
//!   ◀─────────────────┼─────────────────────┴─────────────────┘          │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;

use freshproxy::config::load_config;
use freshproxy::observability::{logging, metrics};
use freshproxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "freshproxy")]
#[command(about = "Token-injecting FreshRSS API proxy", long_about = None)]
struct Cli {
    /// Bind host (overrides FRESHPROXY_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides FRESHPROXY_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging (overrides FRESHPROXY_DEBUG)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.debug |= cli.debug;

    logging::init_logging(config.debug);
    tracing::info!("freshproxy v{} starting", env!("CARGO_PKG_VERSION"));

    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        listen = %config.listen_addr(),
        upstream = %config.upstream_base_url,
        allowed_endpoints = ?config.allowed_endpoints,
        allowed_prefixes = ?config.allowed_prefixes,
        allowed_origins = ?config.allowed_origins,
        request_timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.metrics_address {
        let addr: SocketAddr = addr.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
