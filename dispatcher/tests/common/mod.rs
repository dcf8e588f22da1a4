//! Recording collaborators shared by the dispatcher integration tests.
//!
//! Each mock keeps its state behind `Arc<Mutex<..>>` so a clone handed to the dispatcher and the
//! copy kept by the test observe the same calls.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use dispatcher::{Dispatcher, HandlerRegistry};
use messenger_core::{
    AuditLog, AuditRecord, DeliveryChannel, DeliveryError, DispatchError, DispatchOutcome, FnHandler,
    Handler, InboundEvent, SessionStore, StoreError,
};

/// Session store over a HashMap; counts writes.
#[derive(Clone, Default)]
pub struct MockSessionStore {
    sessions: Arc<Mutex<HashMap<String, Option<String>>>>,
    write_count: Arc<AtomicUsize>,
    fail_reads: bool,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose reads always fail with a database error.
    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// Pre-existing session, not counted as a write.
    pub fn with_session(self, user_id: &str, code: &str) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .insert(user_id.to_string(), Some(code.to_string()));
        self
    }

    pub fn stored(&self, user_id: &str) -> Option<Option<String>> {
        self.sessions.lock().unwrap().get(user_id).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn get_next_handler(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Database("connection refused".to_string()));
        }
        Ok(self.sessions.lock().unwrap().get(user_id).cloned().flatten())
    }

    async fn set_next_handler(&self, user_id: &str, code: Option<&str>) -> Result<(), StoreError> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.sessions
            .lock()
            .unwrap()
            .insert(user_id.to_string(), code.map(str::to_string));
        Ok(())
    }
}

/// Delivery channel that records every send; recipients in `failing` get a platform error.
#[derive(Clone, Default)]
pub struct RecordingDelivery {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    attempts: Arc<AtomicUsize>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient_id: &str) {
        self.failing.lock().unwrap().insert(recipient_id.to_string());
    }

    /// Successful sends as (recipient, text).
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryChannel for RecordingDelivery {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(recipient_id) {
            return Err(DeliveryError::Platform {
                status: 400,
                body: r#"{"error":{"message":"No matching user found"}}"#.to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Audit log that records entries, or fails every call when built with `failing()`.
#[derive(Clone, Default)]
pub struct RecordingAudit {
    records: Arc<Mutex<Vec<AuditRecord>>>,
    fail: bool,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLog for RecordingAudit {
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Database("disk full".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Handler that always returns the same reply and next code.
pub fn fixed(reply: &'static str, next: Option<&'static str>) -> Arc<dyn Handler> {
    Arc::new(FnHandler::new(move |_event| {
        DispatchOutcome::new(reply, next.map(str::to_string))
    }))
}

/// Business handler that always fails with `DispatchError::Handler`.
pub struct FailingHandler(pub &'static str);

#[async_trait]
impl Handler for FailingHandler {
    async fn handle(&self, _event: &InboundEvent) -> messenger_core::Result<DispatchOutcome> {
        Err(DispatchError::Handler(self.0.to_string()))
    }
}

pub fn failing(reason: &'static str) -> Arc<dyn Handler> {
    Arc::new(FailingHandler(reason))
}

/// Default `D` ("hi", no next), message handler `ASK` ("more?", next `ASK`), postback `ASK_PAYLOAD`
/// ("more?", next `ASK`).
pub fn scenario_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .with_message_handler("D", fixed("hi", None), true)
        .unwrap()
        .with_message_handler("ASK", fixed("more?", Some("ASK")), false)
        .unwrap()
        .with_postback_handler("ASK_PAYLOAD", fixed("more?", Some("ASK")))
        .unwrap()
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub sessions: MockSessionStore,
    pub delivery: RecordingDelivery,
    pub audit: RecordingAudit,
}

pub fn harness(registry: HandlerRegistry) -> Harness {
    harness_with(registry, MockSessionStore::new(), RecordingAudit::new())
}

pub fn harness_with(
    registry: HandlerRegistry,
    sessions: MockSessionStore,
    audit: RecordingAudit,
) -> Harness {
    let delivery = RecordingDelivery::new();
    let dispatcher = Dispatcher::new(
        Arc::new(registry),
        Arc::new(sessions.clone()),
        Arc::new(delivery.clone()),
    )
    .with_audit(Arc::new(audit.clone()));
    Harness {
        dispatcher,
        sessions,
        delivery,
        audit,
    }
}
