//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::Result;
use dispatcher::{Dispatcher, EventIntake, HandlerRegistry};
use messenger_core::{AuditLog, DeliveryChannel};
use storage::{AuditRepository, SessionRepository, SqlitePoolManager};
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::handlers::EchoHandler;

/// Code of the built-in default message handler.
pub const DEFAULT_HANDLER: &str = "ECHO_MESSAGE_HANDLER";

/// Sessions, audit log and intake wired over one SQLite pool.
pub struct BotComponents {
    pub sessions: Arc<SessionRepository>,
    pub audit: Option<Arc<AuditRepository>>,
    pub intake: EventIntake,
}

/// Registry with only the echo handler, registered as default.
pub fn default_registry() -> messenger_core::Result<HandlerRegistry> {
    HandlerRegistry::new().with_message_handler(DEFAULT_HANDLER, Arc::new(EchoHandler::new()), true)
}

#[instrument(skip(config, registry, delivery))]
pub async fn build_bot_components(
    config: &BotConfig,
    registry: HandlerRegistry,
    delivery: Arc<dyn DeliveryChannel>,
) -> Result<BotComponents> {
    let pool = SqlitePoolManager::new(&config.database_url)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url,
                "Failed to open database"
            );
            anyhow::anyhow!("Failed to open database: {}", e)
        })?;

    let sessions = Arc::new(SessionRepository::with_pool(pool.clone()).await.map_err(|e| {
        error!(error = %e, "Failed to initialize session storage");
        anyhow::anyhow!("Failed to initialize session storage: {}", e)
    })?);

    let audit = if config.audit_enabled {
        let repo = AuditRepository::with_pool(pool).await.map_err(|e| {
            error!(error = %e, "Failed to initialize audit storage");
            anyhow::anyhow!("Failed to initialize audit storage: {}", e)
        })?;
        Some(Arc::new(repo))
    } else {
        None
    };

    info!(
        message_handlers = registry.message_handler_count(),
        postback_handlers = registry.postback_handler_count(),
        default_handler = registry.default_message_handler().unwrap_or("-"),
        audit_enabled = audit.is_some(),
        "Building dispatcher"
    );

    let mut dispatcher = Dispatcher::new(Arc::new(registry), sessions.clone(), delivery);
    if let Some(ref audit) = audit {
        dispatcher = dispatcher.with_audit(audit.clone() as Arc<dyn AuditLog>);
    }
    let intake = EventIntake::new(dispatcher).with_object_type(config.webhook_object.clone());

    Ok(BotComponents {
        sessions,
        audit,
        intake,
    })
}
