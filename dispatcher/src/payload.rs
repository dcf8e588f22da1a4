//! Webhook payload model: `{ object, entry: [ { messaging: [ ... ] } ] }`.
//!
//! Entries and their messaging events stay as raw JSON until intake decodes them one by one, so a
//! single malformed entry or event cannot fail the whole envelope.

use messenger_core::{EventKind, InboundEvent, MessageBody, PostbackBody};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub messaging: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    pub sender: Party,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub postback: Option<RawPostback>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPostback {
    pub payload: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl MessagingEvent {
    /// Message wins over postback; events with neither (delivery/read receipts, ...) yield `None`.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        let kind = match (self.message, self.postback) {
            (Some(message), _) => EventKind::Message(MessageBody {
                mid: message.mid,
                text: message.text,
            }),
            (None, Some(postback)) => EventKind::Postback(PostbackBody {
                payload: postback.payload,
                title: postback.title,
            }),
            (None, None) => return None,
        };
        Some(InboundEvent {
            sender_id: self.sender.id,
            kind,
            timestamp: self.timestamp,
        })
    }
}

/// Platform ids are strings, but numeric ids show up in hand-written payloads.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
