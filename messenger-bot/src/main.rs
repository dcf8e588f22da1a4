//! Binary for the Messenger bot CLI.

use anyhow::Result;
use clap::Parser;
use messenger_bot::{load_config, run_command, Cli};
use messenger_core::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.token)?;
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        api_url = %config.api_url,
        webhook_object = %config.webhook_object,
        "step: config loaded"
    );

    run_command(config, cli.command).await
}
