//! Dispatcher: the per-user state machine.
//!
//! For each event: resolve handler → invoke → validate the next handler code → persist session →
//! deliver reply → audit. The session is written before delivery, so a failed send never replays
//! a reply but may leave the user one state ahead of what they have seen.

use std::sync::Arc;

use messenger_core::{
    AuditLog, AuditRecord, DeliveryChannel, DispatchError, DispatchOutcome, EventKind,
    InboundEvent, Result, SessionStore,
};
use tracing::{debug, info, instrument, warn};

use crate::registry::HandlerRegistry;

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    sessions: Arc<dyn SessionStore>,
    delivery: Arc<dyn DeliveryChannel>,
    audit: Option<Arc<dyn AuditLog>>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<HandlerRegistry>,
        sessions: Arc<dyn SessionStore>,
        delivery: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            registry,
            sessions,
            delivery,
            audit: None,
        }
    }

    /// Adds a request/response audit log.
    pub fn with_audit(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Handles one event end to end. Returns the handler's outcome once the reply was delivered.
    #[instrument(skip(self, event), fields(user_id = %event.sender_id, event_kind = event.kind_label()))]
    pub async fn dispatch(&self, event: &InboundEvent) -> Result<DispatchOutcome> {
        let outcome = match &event.kind {
            EventKind::Message(_) => self.run_message_handler(event).await?,
            EventKind::Postback(body) => self.run_postback_handler(event, &body.payload).await?,
        };
        self.commit(event, outcome).await
    }

    async fn run_message_handler(&self, event: &InboundEvent) -> Result<DispatchOutcome> {
        let current = self.sessions.get_next_handler(&event.sender_id).await?;
        let (code, handler) = self.registry.lookup_message_handler(current.as_deref())?;
        info!(
            user_id = %event.sender_id,
            session_code = ?current,
            handler_code = %code,
            "step: message handler resolved"
        );
        handler.handle(event).await
    }

    async fn run_postback_handler(
        &self,
        event: &InboundEvent,
        payload: &str,
    ) -> Result<DispatchOutcome> {
        let handler = self.registry.lookup_postback_handler(payload)?;
        info!(
            user_id = %event.sender_id,
            payload_code = %payload,
            "step: postback handler resolved"
        );
        handler.handle(event).await
    }

    /// Applies the transition, then delivers and audits. Nothing is written if the next code is invalid.
    async fn commit(&self, event: &InboundEvent, outcome: DispatchOutcome) -> Result<DispatchOutcome> {
        if let Some(next) = outcome.next_handler.as_deref() {
            if !self.registry.contains_message_handler(next) {
                return Err(DispatchError::UnknownMessageHandler(next.to_string()));
            }
        }

        self.sessions
            .set_next_handler(&event.sender_id, outcome.next_handler.as_deref())
            .await?;
        debug!(
            user_id = %event.sender_id,
            next_handler = ?outcome.next_handler,
            "step: session updated"
        );

        let delivered = self
            .delivery
            .send(&event.sender_id, &outcome.reply_text)
            .await;

        self.record_audit(event, &outcome).await;

        delivered?;
        info!(
            user_id = %event.sender_id,
            reply_len = outcome.reply_text.len(),
            "step: reply delivered"
        );
        Ok(outcome)
    }

    async fn record_audit(&self, event: &InboundEvent, outcome: &DispatchOutcome) {
        let Some(audit) = &self.audit else {
            return;
        };
        let record = AuditRecord::from_event(event, &outcome.reply_text);
        if let Err(e) = audit.record(&record).await {
            warn!(error = %e, user_id = %event.sender_id, "Failed to record audit entry");
        }
    }
}
