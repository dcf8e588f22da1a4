//! Built-in handlers. Business handlers (classifier, rates, weather) are registered by embedders.

use async_trait::async_trait;
use messenger_core::{DispatchOutcome, EventKind, Handler, InboundEvent, Result};

/// Replies with the user's text; postbacks echo their payload code. Never changes state.
#[derive(Clone, Default)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, event: &InboundEvent) -> Result<DispatchOutcome> {
        let reply = match &event.kind {
            EventKind::Message(body) => match body.text.as_deref() {
                Some(text) => format!("Echo: {}", text),
                None => "Echo: (no text)".to_string(),
            },
            EventKind::Postback(body) => format!("Echo: {}", body.payload),
        };
        Ok(DispatchOutcome::reply(reply))
    }
}

/// Fixed reply and next handler code, e.g. a menu button that moves the user into a sub-dialog.
#[derive(Clone)]
pub struct StaticReplyHandler {
    reply: String,
    next_handler: Option<String>,
}

impl StaticReplyHandler {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            next_handler: None,
        }
    }

    pub fn then(mut self, next_handler: impl Into<String>) -> Self {
        self.next_handler = Some(next_handler.into());
        self
    }
}

#[async_trait]
impl Handler for StaticReplyHandler {
    async fn handle(&self, _event: &InboundEvent) -> Result<DispatchOutcome> {
        Ok(DispatchOutcome::new(
            self.reply.clone(),
            self.next_handler.clone(),
        ))
    }
}
