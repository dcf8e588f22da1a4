//! CLI commands for replaying captured webhook bodies and inspecting state.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "messenger-bot")]
#[command(about = "Messenger bot CLI: replay, send, session", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Page access token; overrides PAGE_ACCESS_TOKEN.
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Feed a webhook body (JSON file) through intake, as if Messenger had posted it.
    Replay { file: PathBuf },
    /// Send a text message to a user through the Send API.
    Send {
        #[arg(short, long)]
        recipient: String,
        #[arg(long)]
        text: String,
    },
    /// Print the stored next handler code for a user.
    Session { user_id: String },
}

/// Loads BotConfig from env with the optional CLI token override.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}
