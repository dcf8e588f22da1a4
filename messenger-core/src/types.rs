//! Core types: inbound event, handler outcome, and the Handler trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of a plain user message. Non-text messages (stickers, attachments) have no `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub mid: Option<String>,
    pub text: Option<String>,
}

/// Postback sent when the user taps a button; `payload` is the payload code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostbackBody {
    pub payload: String,
    pub title: Option<String>,
}

/// Exactly one of message or postback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Message(MessageBody),
    Postback(PostbackBody),
}

/// One unit of work extracted from a webhook batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub sender_id: String,
    pub kind: EventKind,
    /// Platform timestamp in milliseconds, when the platform supplied one.
    pub timestamp: Option<i64>,
}

impl InboundEvent {
    /// Text message event without platform metadata.
    pub fn message(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            kind: EventKind::Message(MessageBody {
                mid: None,
                text: Some(text.into()),
            }),
            timestamp: None,
        }
    }

    /// Postback event carrying the given payload code.
    pub fn postback(sender_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            kind: EventKind::Postback(PostbackBody {
                payload: payload.into(),
                title: None,
            }),
            timestamp: None,
        }
    }

    /// `"message"` or `"postback"`; used in logs and audit records.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            EventKind::Message(_) => "message",
            EventKind::Postback(_) => "postback",
        }
    }

    /// Message text, if this is a message event with text.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Message(body) => body.text.as_deref(),
            EventKind::Postback(_) => None,
        }
    }

    /// Payload code, if this is a postback event.
    pub fn postback_payload(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Message(_) => None,
            EventKind::Postback(body) => Some(body.payload.as_str()),
        }
    }
}

/// What a handler returns: the reply to send and the handler code for the user's next message.
///
/// `next_handler == None` clears the user's override so the next message goes to the default handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub reply_text: String,
    pub next_handler: Option<String>,
}

impl DispatchOutcome {
    pub fn new(reply_text: impl Into<String>, next_handler: Option<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
            next_handler,
        }
    }

    /// Reply and return the user to the default handler.
    pub fn reply(reply_text: impl Into<String>) -> Self {
        Self::new(reply_text, None)
    }

    /// Reply and route the user's next message to `next_handler`.
    pub fn reply_then(reply_text: impl Into<String>, next_handler: impl Into<String>) -> Self {
        Self::new(reply_text, Some(next_handler.into()))
    }
}

/// A message or postback handler. Handlers compute a reply; they never touch session state.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, event: &InboundEvent) -> crate::error::Result<DispatchOutcome>;
}
