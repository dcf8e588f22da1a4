//! Bot config: Send API access, database, log file, intake settings. Loaded from env.

use anyhow::Result;
use dispatcher::PAGE_OBJECT;
use messenger_platform::{MessengerConfig, DEFAULT_API_URL};
use std::env;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// PAGE_ACCESS_TOKEN; only commands that send messages need it.
    pub page_access_token: Option<String>,
    /// MESSENGER_API_URL
    pub api_url: String,
    /// DATABASE_URL (sessions and audit entries)
    pub database_url: String,
    /// LOG_FILE
    pub log_file: String,
    /// WEBHOOK_OBJECT: object tag accepted by intake
    pub webhook_object: String,
    /// AUDIT_ENABLED
    pub audit_enabled: bool,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides PAGE_ACCESS_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let page_access_token = token
            .or_else(|| env::var("PAGE_ACCESS_TOKEN").ok())
            .filter(|t| !t.trim().is_empty());
        let api_url = env::var("MESSENGER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "file:./messenger_bot.db".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/messenger-bot.log".to_string());
        let webhook_object = env::var("WEBHOOK_OBJECT").unwrap_or_else(|_| PAGE_OBJECT.to_string());
        let audit_enabled = env::var("AUDIT_ENABLED")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            page_access_token,
            api_url,
            database_url,
            log_file,
            webhook_object,
            audit_enabled,
        })
    }

    /// Fail fast before init: the API URL must parse even when no token is set.
    pub fn validate(&self) -> Result<()> {
        let token = self.page_access_token.clone().unwrap_or_else(|| "unset".to_string());
        MessengerConfig::with_token(token)
            .with_api_url(self.api_url.clone())
            .validate()
    }

    /// Send API config; errors when no access token was configured.
    pub fn messenger_config(&self) -> Result<MessengerConfig> {
        let token = self
            .page_access_token
            .clone()
            .ok_or_else(|| anyhow::anyhow!("PAGE_ACCESS_TOKEN not set (or pass --token)"))?;
        Ok(MessengerConfig::with_token(token).with_api_url(self.api_url.clone()))
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
