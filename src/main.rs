//! Prerender relay.
//!
//! Sits in front of a web application and hands crawler-facing pages to a
//! remote rendering service.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────┐
//!                       │                PRERENDER RELAY               │
//!   Client Request      │  ┌──────────┐   ┌────────────┐               │
//!   ────────────────────┼─▶│  axum    │──▶│ classifier │──── no ───┐   │
//!                       │  │  server  │   └─────┬──────┘           │   │
//!                       │  └──────────┘         │ yes              ▼   │
//!                       │                 ┌─────▼──────┐     ┌────────┐│
//!                       │                 │   relay    │─5xx▶│ origin ││──▶ Origin App
//!                       │                 └─────┬──────┘     └────────┘│
//!                       │                 ┌─────▼──────┐               │
//!   Client Response     │                 │ gzip/gunzip│               │
//!   ◀───────────────────┼─────────────────┴────────────┘               │
//!                       └──────────────────────┬───────────────────────┘
//!                                              ▼
//!                                    Rendering Service
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use prerender_relay::config::{load_config, load_from_env};
use prerender_relay::http::HttpServer;
use prerender_relay::lifecycle::{wait_for_signal, Shutdown};
use prerender_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "prerender-relay")]
#[command(about = "Serve prerendered pages to crawlers in front of a web application", long_about = None)]
struct Args {
    /// TOML configuration file. PRERENDER_* environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    logging::init_tracing(&config.observability);

    tracing::info!("prerender-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        service_url = %config.prerender.service_url,
        token_set = !config.prerender.token.is_empty(),
        bots_only = config.prerender.bots_only,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(wait_for_signal(shutdown));

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
