//! rrest CLI: command-line client for a running rrest gateway.
//!
//! Subcommands: status, payment get, payment send.

mod commands;

use clap::{Parser, Subcommand};

/// rrest: talk to a ledger REST gateway.
#[derive(Parser, Debug)]
#[command(name = "rrest", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show whether the gateway is connected to its ledger peer.
    Status(commands::status::StatusArgs),
    /// Look up or send payments.
    #[command(subcommand)]
    Payment(commands::payment::PaymentCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Payment(cmd) => commands::payment::run(cmd).await,
    }
}
