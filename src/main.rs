//! Page server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 PAGE SERVER                   │
//!                         │                                               │
//!   POST /pages/<path>    │  ┌────────┐   ┌──────────┐   ┌────────────┐  │
//!   ──────────────────────┼─▶│  http  │──▶│ resolver │──▶│  routing   │  │
//!                         │  │ server │   │  engine  │   │   table    │  │
//!                         │  └────────┘   └────┬─────┘   └────────────┘  │
//!                         │                    │                          │
//!                         │                    ▼                          │
//!                         │              ┌──────────┐    ┌────────────┐  │
//!   PageResult JSON       │              │ content  │───▶│ FsStore /  │  │
//!   ◀─────────────────────┼──────────────│  cache   │    │ BlobStore  │  │
//!                         │              └────┬─────┘    └────────────┘  │
//!                         │                   │                           │
//!                         │                   ▼                           │
//!                         │              ┌──────────┐                     │
//!                         │              │ template │                     │
//!                         │              │ renderer │                     │
//!                         │              └──────────┘                     │
//!                         │                                               │
//!                         │  cross-cutting: config · observability ·      │
//!                         │  /api proxy · static assets · SPA shell       │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::Path;

use tokio::net::TcpListener;

use pageserve::config::{load_config, ServerConfig};
use pageserve::http::HttpServer;
use pageserve::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pageserve.toml".to_string());

    let config = if Path::new(&config_path).exists() {
        load_config(Path::new(&config_path))?
    } else {
        ServerConfig::default()
    };

    logging::init(&config.observability.log_filter);

    tracing::info!("pageserve v0.1.0 starting");
    tracing::info!(
        config = %config_path,
        bind_address = %config.listener.bind_address,
        content_root = %config.content.root,
        routes = config.routes.len(),
        debug_reads = config.content.debug_reads,
        proxy_enabled = config.proxy.enabled,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
