//! Event intake: splits a webhook batch into events and dispatches them in order.
//!
//! Every event yields its own [`EventResult`]; the loop collects them and always moves on, so the
//! webhook caller gets the same [`Acknowledgement`] whatever happened to individual events.

use messenger_core::{DispatchError, DispatchOutcome};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::dispatcher::Dispatcher;
use crate::payload::{Entry, MessagingEvent, WebhookPayload};

/// Object tag of page subscriptions.
pub const PAGE_OBJECT: &str = "page";

/// Fixed reply to the webhook caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    pub status: u16,
    pub body: &'static str,
}

impl Acknowledgement {
    pub const OK: Acknowledgement = Acknowledgement {
        status: 200,
        body: "ok",
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Dispatched(DispatchOutcome),
    /// Neither message nor postback.
    Ignored,
}

#[derive(Error, Debug)]
pub enum EventFailure {
    #[error("Malformed webhook data: {0}")]
    Malformed(String),

    #[error("{event_kind} event from {sender_id} failed: {source}")]
    Dispatch {
        sender_id: String,
        event_kind: &'static str,
        #[source]
        source: DispatchError,
    },
}

pub type EventResult = std::result::Result<EventOutcome, EventFailure>;

/// Per-event results of one batch, in payload order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<EventResult>,
    /// Set when the whole batch was skipped (unparseable body or foreign object tag).
    pub rejected: Option<String>,
}

impl BatchReport {
    fn skipped(reason: String) -> Self {
        Self {
            results: Vec::new(),
            rejected: Some(reason),
        }
    }

    pub fn dispatched(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Ok(EventOutcome::Dispatched(_))))
            .count()
    }

    pub fn ignored(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, Ok(EventOutcome::Ignored)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }
}

#[derive(Clone)]
pub struct EventIntake {
    dispatcher: Dispatcher,
    object_type: String,
}

impl EventIntake {
    /// Intake accepting `page` batches.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            object_type: PAGE_OBJECT.to_string(),
        }
    }

    pub fn with_object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = object_type.into();
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Webhook entry point: processes the raw body and acknowledges unconditionally.
    pub async fn handle_webhook(&self, body: &[u8]) -> Acknowledgement {
        let report = self.process_body(body).await;
        info!(
            dispatched = report.dispatched(),
            ignored = report.ignored(),
            failed = report.failed(),
            rejected = ?report.rejected,
            "Webhook batch processed"
        );
        Acknowledgement::OK
    }

    /// Decodes the envelope and processes it. An undecodable body yields a rejected report.
    pub async fn process_body(&self, body: &[u8]) -> BatchReport {
        match serde_json::from_slice::<WebhookPayload>(body) {
            Ok(payload) => self.process_batch(&payload).await,
            Err(e) => {
                error!(error = %e, body_len = body.len(), "Failed to decode webhook payload");
                BatchReport::skipped(format!("invalid payload: {}", e))
            }
        }
    }

    /// Dispatches every messaging event of every entry, sequentially and in order.
    #[instrument(skip(self, payload), fields(object = %payload.object, entries = payload.entry.len()))]
    pub async fn process_batch(&self, payload: &WebhookPayload) -> BatchReport {
        if payload.object != self.object_type {
            warn!(
                object = %payload.object,
                expected = %self.object_type,
                "Skipping webhook batch with unexpected object type"
            );
            return BatchReport::skipped(format!("unexpected object type: {}", payload.object));
        }

        let mut report = BatchReport::default();
        for raw_entry in &payload.entry {
            let entry = match Entry::deserialize(raw_entry) {
                Ok(entry) => entry,
                Err(e) => {
                    error!(error = %e, "Malformed webhook entry, continuing with batch");
                    report
                        .results
                        .push(Err(EventFailure::Malformed(format!("entry: {}", e))));
                    continue;
                }
            };
            for raw in &entry.messaging {
                let result = self.process_event(raw).await;
                match &result {
                    Err(EventFailure::Dispatch {
                        sender_id,
                        event_kind,
                        source,
                    }) => error!(
                        user_id = %sender_id,
                        event_kind = *event_kind,
                        error_kind = source.kind(),
                        error = %source,
                        "Event failed, continuing with batch"
                    ),
                    Err(failure) => {
                        error!(error = %failure, "Event failed, continuing with batch")
                    }
                    Ok(_) => {}
                }
                report.results.push(result);
            }
        }
        report
    }

    async fn process_event(&self, raw: &serde_json::Value) -> EventResult {
        let event = MessagingEvent::deserialize(raw)
            .map_err(|e| EventFailure::Malformed(e.to_string()))?;

        let Some(inbound) = event.into_inbound() else {
            debug!("Ignoring messaging event without message or postback");
            return Ok(EventOutcome::Ignored);
        };

        self.dispatcher
            .dispatch(&inbound)
            .await
            .map(EventOutcome::Dispatched)
            .map_err(|source| EventFailure::Dispatch {
                sender_id: inbound.sender_id.clone(),
                event_kind: inbound.kind_label(),
                source,
            })
    }
}
