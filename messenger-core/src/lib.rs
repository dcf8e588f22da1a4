//! # messenger-core
//!
//! Core types and traits for the webhook dispatcher: inbound events, [`Handler`], the collaborator
//! contracts ([`SessionStore`], [`DeliveryChannel`], [`AuditLog`]), the error taxonomy, and tracing
//! initialization. Transport-agnostic; used by dispatcher, storage and messenger-platform.

pub mod collaborators;
pub mod error;
pub mod handler;
pub mod logger;
pub mod types;

pub use collaborators::{AuditLog, AuditRecord, DeliveryChannel, SessionStore, UserSession};
pub use error::{DeliveryError, DispatchError, HandlerKind, Result, StoreError};
pub use handler::FnHandler;
pub use logger::init_tracing;
pub use types::{DispatchOutcome, EventKind, Handler, InboundEvent, MessageBody, PostbackBody};
