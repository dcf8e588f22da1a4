//! Send API configuration: page access token and Graph API base URL.
//! Loaded from the PAGE_ACCESS_TOKEN and MESSENGER_API_URL environment variables.

use anyhow::Result;
use std::env;

pub const DEFAULT_API_URL: &str = "https://graph.facebook.com/v2.6";

#[derive(Debug, Clone)]
pub struct MessengerConfig {
    pub access_token: String,
    /// Base URL; the client posts to `{api_url}/me/messages`.
    pub api_url: String,
}

impl MessengerConfig {
    /// PAGE_ACCESS_TOKEN is required; MESSENGER_API_URL defaults to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self> {
        let access_token = env::var("PAGE_ACCESS_TOKEN")
            .map_err(|_| anyhow::anyhow!("PAGE_ACCESS_TOKEN not set"))?;
        let api_url = env::var("MESSENGER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Ok(Self {
            access_token,
            api_url,
        })
    }

    /// Uses the given token and the default API URL.
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// `{api_url}/me/messages`, tolerating a trailing slash on the base URL.
    pub fn messages_url(&self) -> String {
        format!("{}/me/messages", self.api_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            anyhow::bail!("PAGE_ACCESS_TOKEN is empty");
        }
        if reqwest::Url::parse(&self.api_url).is_err() {
            anyhow::bail!("MESSENGER_API_URL is not a valid URL: {}", self.api_url);
        }
        Ok(())
    }
}
