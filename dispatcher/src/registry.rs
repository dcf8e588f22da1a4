//! Handler registry: message handlers keyed by handler code, postback handlers keyed by payload code.
//!
//! Built once at startup, then shared read-only (behind an `Arc`) by the dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use messenger_core::{DispatchError, Handler, HandlerKind, Result};
use tracing::info;

#[derive(Clone, Default)]
pub struct HandlerRegistry {
    message_handlers: HashMap<String, Arc<dyn Handler>>,
    postback_handlers: HashMap<String, Arc<dyn Handler>>,
    default_message_handler: Option<String>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a message handler under `code`.
    ///
    /// With `is_default`, the handler becomes the target for users without a (resolvable) session
    /// code. A later default registration moves the pointer; the earlier handler stays registered.
    pub fn register_message_handler(
        &mut self,
        code: impl Into<String>,
        handler: Arc<dyn Handler>,
        is_default: bool,
    ) -> Result<()> {
        let code = code.into();
        if self.message_handlers.contains_key(&code) {
            return Err(DispatchError::DuplicateHandler {
                kind: HandlerKind::Message,
                code,
            });
        }
        info!(handler_code = %code, is_default, "Registered message handler");
        if is_default {
            self.default_message_handler = Some(code.clone());
        }
        self.message_handlers.insert(code, handler);
        Ok(())
    }

    /// Registers a postback handler under the payload code its button sends.
    pub fn register_postback_handler(
        &mut self,
        code: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<()> {
        let code = code.into();
        if self.postback_handlers.contains_key(&code) {
            return Err(DispatchError::DuplicateHandler {
                kind: HandlerKind::Postback,
                code,
            });
        }
        info!(payload_code = %code, "Registered postback handler");
        self.postback_handlers.insert(code, handler);
        Ok(())
    }

    /// Builder-style [`Self::register_message_handler`].
    pub fn with_message_handler(
        mut self,
        code: impl Into<String>,
        handler: Arc<dyn Handler>,
        is_default: bool,
    ) -> Result<Self> {
        self.register_message_handler(code, handler, is_default)?;
        Ok(self)
    }

    /// Builder-style [`Self::register_postback_handler`].
    pub fn with_postback_handler(
        mut self,
        code: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<Self> {
        self.register_postback_handler(code, handler)?;
        Ok(self)
    }

    /// Resolves the message handler for a session code, falling back to the default handler when
    /// the code is absent or not registered. Returns the resolved code with the handler.
    pub fn lookup_message_handler(
        &self,
        code: Option<&str>,
    ) -> Result<(&str, &Arc<dyn Handler>)> {
        if let Some((code, handler)) = code.and_then(|c| self.message_handlers.get_key_value(c)) {
            return Ok((code.as_str(), handler));
        }
        self.default_message_handler
            .as_deref()
            .and_then(|d| self.message_handlers.get_key_value(d))
            .map(|(code, handler)| (code.as_str(), handler))
            .ok_or(DispatchError::NoDefaultHandler)
    }

    /// Resolves a postback handler by exact payload code. There is no fallback.
    pub fn lookup_postback_handler(&self, code: &str) -> Result<&Arc<dyn Handler>> {
        self.postback_handlers
            .get(code)
            .ok_or_else(|| DispatchError::UnknownPostback(code.to_string()))
    }

    pub fn contains_message_handler(&self, code: &str) -> bool {
        self.message_handlers.contains_key(code)
    }

    pub fn contains_postback_handler(&self, code: &str) -> bool {
        self.postback_handlers.contains_key(code)
    }

    pub fn default_message_handler(&self) -> Option<&str> {
        self.default_message_handler.as_deref()
    }

    pub fn message_handler_count(&self) -> usize {
        self.message_handlers.len()
    }

    pub fn postback_handler_count(&self) -> usize {
        self.postback_handlers.len()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut message: Vec<&String> = self.message_handlers.keys().collect();
        let mut postback: Vec<&String> = self.postback_handlers.keys().collect();
        message.sort();
        postback.sort();
        f.debug_struct("HandlerRegistry")
            .field("message_handlers", &message)
            .field("postback_handlers", &postback)
            .field("default_message_handler", &self.default_message_handler)
            .finish()
    }
}
