//! iiko API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                ┌──────────────────────────────────────────────┐
//!     POST /api ───────────▶│  http::server  ──▶  translator  ──▶ upstream │────▶ iiko Cloud API
//!     {endpoint, body}      │   (axum)          (rule table)     (reqwest) │
//!                           │                                              │
//!     ◀─────────────────────│  http::response  ◀───────────────────────────│◀──── status + body
//!                           │                                              │
//!                           │  config · observability · lifecycle          │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use iiko_gateway::config::{load_config, GatewayConfig};
use iiko_gateway::config::validation::validate_config;
use iiko_gateway::lifecycle::{self, Shutdown};
use iiko_gateway::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "iiko-gateway")]
#[command(author, version, about = "Request-shaping gateway for the iiko Cloud API")]
struct Args {
    /// Configuration file path (TOML). Defaults are used when omitted.
    #[arg(short, long, env = "IIKO_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. "127.0.0.1:8080").
    #[arg(long, env = "IIKO_GATEWAY_BIND")]
    bind: Option<String>,

    /// Override the upstream base URL.
    #[arg(long, env = "IIKO_GATEWAY_UPSTREAM")]
    upstream: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Validate configuration and exit.
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.base_url = upstream;
    }
    if let Some(level) = args.log_level {
        config.observability.log_level = level;
    }

    // Overrides bypass the loader, so check again
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("invalid configuration: {}", error);
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    if args.validate {
        println!("Configuration is valid");
        return Ok(());
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "iiko-gateway starting"
    );

    let shutdown = Shutdown::new();
    lifecycle::start(config, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
