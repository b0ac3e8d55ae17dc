//! rrest gateway node: entry point.
//!
//! Starts the REST gateway with configuration from a TOML file or defaults.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rrest_ledger::JsonRpcPeer;
use rrest_node::{start_api_server, AppState, GatewayConfig, PaymentSettings};

/// rrest gateway node
#[derive(Parser, Debug)]
#[command(name = "rrest-node", version, about = "REST gateway for a ledger network")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "rrest.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the ledger peer JSON-RPC URL.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

fn init_tracing(config: &GatewayConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("received shutdown signal");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = if args.init {
        GatewayConfig::default()
    } else {
        GatewayConfig::load(&args.config)?
    };

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(rpc_url) = args.rpc_url {
        config.ledger.rpc_url = rpc_url;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config);

    // Handle --init flag
    if args.init {
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    tracing::info!("rrest gateway v{}", env!("CARGO_PKG_VERSION"));

    let peer = JsonRpcPeer::new(config.ledger.rpc_url.clone(), config.ledger_timeout())?;
    tracing::info!(rpc_url = %config.ledger.rpc_url, "using ledger peer");

    let state = Arc::new(AppState::new(
        Arc::new(peer),
        PaymentSettings::from_config(&config),
    ));
    start_api_server(config.api_socket_addr()?, state, shutdown_signal()).await?;

    tracing::info!("rrest gateway exited cleanly");
    Ok(())
}
