//! Send API client: delivers reply text to a user via `POST /me/messages`.
//! Production code goes through the Graph API; tests point `api_url` at a mock server.

use async_trait::async_trait;
use messenger_core::{DeliveryChannel, DeliveryError};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::config::MessengerConfig;

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: TextMessage<'a>,
}

/// Masks a token for logs: first 4 + "***" + last 4 chars; short tokens become "***".
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[derive(Clone)]
pub struct SendApiClient {
    http: reqwest::Client,
    config: MessengerConfig,
}

impl SendApiClient {
    pub fn new(config: MessengerConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Uses a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(http: reqwest::Client, config: MessengerConfig) -> Self {
        info!(
            api_url = %config.api_url,
            access_token = %mask_token(&config.access_token),
            "Send API client configured"
        );
        Self { http, config }
    }

    pub fn config(&self) -> &MessengerConfig {
        &self.config
    }
}

#[async_trait]
impl DeliveryChannel for SendApiClient {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError> {
        let request = SendRequest {
            recipient: Recipient { id: recipient_id },
            message: TextMessage { text },
        };

        let response = self
            .http
            .post(self.config.messages_url())
            .query(&[("access_token", self.config.access_token.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(recipient_id = %recipient_id, error = %e, "Send API request failed");
                DeliveryError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                recipient_id = %recipient_id,
                status = status.as_u16(),
                body = %body,
                "Send API rejected message"
            );
            return Err(DeliveryError::Platform {
                status: status.as_u16(),
                body,
            });
        }

        debug!(recipient_id = %recipient_id, status = status.as_u16(), "Message sent");
        Ok(())
    }
}
