//! Edge service (v1)
//!
//! A small HTTP edge service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────────┐
//!                          │                     EDGE SERVICE                      │
//!     Client Request       │  ┌──────────┐   ┌──────────┐   ┌─────────────────┐   │
//!     ─────────────────────┼─▶│ security │──▶│ access   │──▶│  CORS guard     │   │
//!                          │  │ headers  │   │ gate     │   │                 │   │
//!                          │  └──────────┘   └──────────┘   └────────┬────────┘   │
//!                          │                                         │            │
//!                          │                      ┌──────────────────┴─────┐      │
//!                          │                      ▼                        ▼      │
//!                          │              ┌──────────────┐        ┌────────────┐  │
//!                          │              │ date engine  │        │  presence  │──┼──▶ Upstream
//!                          │              │  (age math)  │        │  adapter   │  │    presence API
//!                          │              └──────────────┘        └────────────┘  │
//!                          │                                                      │
//!                          │  config · observability · lifecycle                  │
//!                          └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edge_service::config::load_config;
use edge_service::lifecycle::startup;
use edge_service::observability::logging;

#[derive(Parser)]
#[command(name = "edge-service")]
#[command(about = "Age calculator and presence lookup HTTP service", long_about = None)]
struct Args {
    /// Optional TOML configuration file. `port` and `ip` env vars override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("edge-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        allowed_ip = %config.access.allowed_ip,
        max_requests = config.access.max_requests,
        window_secs = config.access.window_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
