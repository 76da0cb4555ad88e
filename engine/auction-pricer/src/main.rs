//! # Auction Pricer Binary

use anyhow::Result;
use auction_pricer::cli::{Cli, CliHandler};
use auction_pricer::logging::initialize_logging;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli.log_level, &cli.log_format)?;
    info!("Starting auction pricer");

    let handler = CliHandler::new(cli.config.as_deref())?;

    if let Err(e) = handler.handle_command(cli.command).await {
        error!("Command failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
