//! Contracts the dispatcher needs from the outside world: session storage, reply delivery, audit.
//!
//! All three are transport-agnostic; `storage` and `messenger-platform` provide implementations,
//! tests substitute recording mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeliveryError, StoreError};
use crate::types::{EventKind, InboundEvent};

/// One user's conversational cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    /// Code of the message handler for the user's next message; `None` means the default handler.
    pub next_handler: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user storage of the next message handler code.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored code, or `None` when the user has no session or no override.
    async fn get_next_handler(&self, user_id: &str) -> Result<Option<String>, StoreError>;
    /// Upserts the user's session.
    async fn set_next_handler(&self, user_id: &str, code: Option<&str>) -> Result<(), StoreError>;
}

/// Sends reply text to a user through the messaging platform.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError>;
}

/// A handled request and the reply produced for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub user_id: String,
    /// `"message"` or `"postback"`.
    pub request_type: String,
    pub request_message: Option<String>,
    pub postback_type: Option<String>,
    pub response_text: String,
}

impl AuditRecord {
    pub fn from_event(event: &InboundEvent, response_text: &str) -> Self {
        let (request_message, postback_type) = match &event.kind {
            EventKind::Message(body) => (body.text.clone(), None),
            EventKind::Postback(body) => (None, Some(body.payload.clone())),
        };
        Self {
            user_id: event.sender_id.clone(),
            request_type: event.kind_label().to_string(),
            request_message,
            postback_type,
            response_text: response_text.to_string(),
        }
    }
}

/// Optional request/response log. Best-effort: the dispatcher only logs its failures.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError>;
}
