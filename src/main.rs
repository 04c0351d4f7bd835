//! Music API Relay
//!
//! An HTTP relay for a private, encrypted music-streaming API, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────────────┐
//!                      │                    MUSIC API RELAY                  │
//!                      │                                                     │
//!     Client Request   │  ┌──────────┐   ┌───────────┐   ┌──────────────┐   │
//!     ─────────────────┼─▶│   http   │──▶│  context  │──▶│ route table  │   │
//!                      │  │  server  │   │  (merge)  │   │   (exact)    │   │
//!                      │  └──────────┘   └───────────┘   └──────┬───────┘   │
//!                      │                                        │           │
//!                      │                                        ▼           │
//!                      │                  ┌────────┐    ┌──────────────┐    │
//!                      │                  │ crypto │◀───│   handler    │    │
//!                      │                  │envelope│    │  (modules/)  │    │
//!                      │                  └────────┘    └──────┬───────┘    │
//!                      │                                       │            │
//!     Client Response  │  ┌──────────┐   ┌───────────┐  ┌──────▼───────┐   │
//!     ◀────────────────┼──│ response │◀──│  cookie   │◀─│   upstream   │◀──┼── Music API
//!                      │  │  shaping │   │  policy   │  │    client    │   │
//!                      │  └──────────┘   └───────────┘  └──────────────┘   │
//!                      │                                                    │
//!                      │  ┌──────────────────────────────────────────────┐  │
//!                      │  │           Cross-Cutting Concerns             │  │
//!                      │  │  ┌────────┐  ┌───────────────┐  ┌─────────┐  │  │
//!                      │  │  │ config │  │ observability │  │  CORS + │  │  │
//!                      │  │  │        │  │ logs/metrics  │  │  req-id │  │  │
//!                      │  │  └────────┘  └───────────────┘  └─────────┘  │  │
//!                      │  └──────────────────────────────────────────────┘  │
//!                      └────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use music_api_proxy::config::loader::load_config;
use music_api_proxy::http::HttpServer;
use music_api_proxy::modules;
use music_api_proxy::observability::{logging, metrics};
use music_api_proxy::routing::RouteTable;
use music_api_proxy::upstream::UpstreamClient;

#[derive(Parser)]
#[command(name = "music-api-proxy")]
#[command(about = "HTTP relay for an encrypted music-streaming API")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration: file → environment → CLI flags
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("music-api-proxy v0.1.0 starting");
    tracing::info!(
        bind_address = %config.server.bind_address(),
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    // Initialize metrics server
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

    // Build the route table from the compiled-in handlers
    let table = RouteTable::build(modules::all(), &config.route_overrides);
    tracing::info!(routes = table.len(), "Route table built");
    for route in table.routes() {
        tracing::debug!(name = route.name, path = %route.path, "Route mounted");
    }

    let upstream = UpstreamClient::new(&config.upstream)?;

    // Bind TCP listener
    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(config, table, upstream);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
