//! Embedded HTTP server (v1)
//!
//! Serves static directories and a small JSON API from a TOML configuration.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                 EMBEDDED HTTPD                    │
//!                         │                                                   │
//!   Client Request        │  ┌─────────┐   ┌─────────┐   ┌──────────────┐    │
//!   ──────────────────────┼─▶│   net   │──▶│  http   │──▶│   routing    │    │
//!                         │  │listener │   │ server  │   │ (prefix, ctx)│    │
//!                         │  └─────────┘   └─────────┘   └──────┬───────┘    │
//!                         │                                     │            │
//!                         │                                     ▼            │
//!                         │                              ┌──────────────┐    │
//!                         │                              │   security   │    │
//!                         │                              │  (auth gate) │    │
//!                         │                              └──────┬───────┘    │
//!                         │                                     ▼            │
//!   Client Response       │  ┌──────────┐                ┌──────────────┐    │
//!   ◀─────────────────────┼──│ response │◀───────────────│   handlers   │    │
//!                         │  │ encoder  │                │ file / api   │    │
//!                         │  └──────────┘                └──────────────┘    │
//!                         └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use embedded_httpd::config::loader::load_config;
use embedded_httpd::config::validation::validate_config;
use embedded_httpd::config::{ServerConfig, StaticDirConfig};
use embedded_httpd::lifecycle::{signals, startup, Shutdown};
use embedded_httpd::observability::{logging, metrics};
use embedded_httpd::Server;

#[derive(Parser)]
#[command(name = "embedded-httpd")]
#[command(about = "Small embeddable HTTP server for files and JSON APIs", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve this directory at `/`.
    #[arg(short, long)]
    root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(root) = &args.root {
        config.static_dirs.push(StaticDirConfig {
            prefix: "/".to_string(),
            root_path: root.display().to_string(),
        });
    }
    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            eprintln!("config error: {}", e);
        }
        return Err("invalid configuration".into());
    }

    logging::init(&config.observability);
    tracing::info!("embedded-httpd v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address,
        port = config.port,
        backlog = config.backlog,
        require_auth = config.require_auth,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = Server::bind(&config)?;
    let routes = startup::routes_from_config(&config);
    let server = Server::new(routes, config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
