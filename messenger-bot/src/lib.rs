//! # Messenger bot application
//!
//! Wires the dispatcher, SQLite storage and the Send API client. Loads config from env;
//! the CLI replays captured webhook bodies through the same intake a webhook server would use.

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, default_registry, BotComponents, DEFAULT_HANDLER};
pub use config::BotConfig;
pub use handlers::{EchoHandler, StaticReplyHandler};
pub use runner::{build_with_send_api, replay_file, run_command, send_message, show_session};
