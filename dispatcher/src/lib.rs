//! # Dispatcher
//!
//! Routes webhook events to registered handlers by per-user conversation state. [`HandlerRegistry`]
//! holds the handlers, [`Dispatcher`] runs the state machine for one event, and [`EventIntake`]
//! feeds a whole webhook batch through the dispatcher with per-event failure isolation.

mod dispatcher;
mod intake;
mod payload;
mod registry;

pub use dispatcher::Dispatcher;
pub use intake::{
    Acknowledgement, BatchReport, EventFailure, EventIntake, EventOutcome, EventResult, PAGE_OBJECT,
};
pub use payload::{Entry, MessagingEvent, WebhookPayload};
pub use registry::HandlerRegistry;

// Integration tests live in tests/
