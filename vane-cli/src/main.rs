//! Vane - an HD wallet CLI for EVM chains.
//!
//! Derive accounts from a BIP-39 phrase and send native or ERC-20 transfers.

mod commands;

use clap::Parser;
use commands::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "vane=debug,vane_evm=debug,vane_cli=debug"
        } else {
            "vane=info,vane_evm=info,vane_cli=info"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Wallet(cmd) => cmd.execute(&cli.network)?,
        Commands::Send(cmd) => cmd.execute(&cli.network).await?,
        Commands::SendToken(cmd) => cmd.execute(&cli.network).await?,
        Commands::Balance(cmd) => cmd.execute(&cli.network).await?,
    }
    Ok(())
}
