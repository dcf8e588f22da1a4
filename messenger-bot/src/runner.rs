//! Command runners. Each one builds only what it needs from BotConfig.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use dispatcher::{BatchReport, EventFailure, HandlerRegistry};
use messenger_core::{DeliveryChannel, UserSession};
use messenger_platform::SendApiClient;
use storage::SessionRepository;
use tracing::{error, info, instrument};

use crate::cli::Commands;
use crate::components::{build_bot_components, default_registry, BotComponents};
use crate::config::BotConfig;

/// Runs one CLI command with the built-in handler registry.
pub async fn run_command(config: BotConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Replay { file } => {
            let report = replay_file(&config, default_registry()?, &file).await?;
            print_report(&report);
            Ok(())
        }
        Commands::Send { recipient, text } => send_message(&config, &recipient, &text).await,
        Commands::Session { user_id } => {
            match show_session(&config, &user_id).await? {
                Some(session) => println!(
                    "{}\t{}\t{}",
                    session.user_id,
                    session.next_handler.as_deref().unwrap_or("(default)"),
                    session.updated_at.to_rfc3339()
                ),
                None => println!("{}\t(no session)", user_id),
            }
            Ok(())
        }
    }
}

/// Builds components with a Send API client for the configured page.
pub async fn build_with_send_api(
    config: &BotConfig,
    registry: HandlerRegistry,
) -> Result<BotComponents> {
    let client: Arc<dyn DeliveryChannel> = Arc::new(SendApiClient::new(config.messenger_config()?));
    build_bot_components(config, registry, client).await
}

/// Reads a webhook body from `path` and runs it through intake.
#[instrument(skip(config, registry))]
pub async fn replay_file(
    config: &BotConfig,
    registry: HandlerRegistry,
    path: &Path,
) -> Result<BatchReport> {
    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read webhook body from {}", path.display()))?;

    info!(step = "replay", bytes = body.len(), "step: replaying webhook body");
    let components = build_with_send_api(config, registry).await?;
    let report = components.intake.process_body(&body).await;
    info!(
        step = "replay_done",
        dispatched = report.dispatched(),
        ignored = report.ignored(),
        failed = report.failed(),
        "step: replay finished"
    );
    Ok(report)
}

#[instrument(skip(config, text))]
pub async fn send_message(config: &BotConfig, recipient: &str, text: &str) -> Result<()> {
    let client = SendApiClient::new(config.messenger_config()?);
    client.send(recipient, text).await.map_err(|e| {
        error!(error = %e, recipient = %recipient, "Send failed");
        anyhow::anyhow!("Send failed: {}", e)
    })?;
    info!(step = "send_done", recipient = %recipient, "step: message sent");
    Ok(())
}

pub async fn show_session(config: &BotConfig, user_id: &str) -> Result<Option<UserSession>> {
    let sessions = SessionRepository::new(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open session storage: {}", e))?;
    sessions
        .get_session(user_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read session: {}", e))
}

fn print_report(report: &BatchReport) {
    if let Some(ref reason) = report.rejected {
        println!("batch rejected: {}", reason);
        return;
    }
    println!(
        "dispatched={} ignored={} failed={}",
        report.dispatched(),
        report.ignored(),
        report.failed()
    );
    for (index, result) in report.results.iter().enumerate() {
        if let Err(failure) = result {
            match failure {
                EventFailure::Malformed(reason) => println!("  #{} malformed: {}", index, reason),
                EventFailure::Dispatch { source, .. } => {
                    println!("  #{} {}: {}", index, source.kind(), failure)
                }
            }
        }
    }
}
