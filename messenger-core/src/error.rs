use thiserror::Error;

/// Which registry namespace a handler code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Message,
    Postback,
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerKind::Message => write!(f, "message"),
            HandlerKind::Postback => write!(f, "postback"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Duplicate {kind} handler code: {code}")]
    DuplicateHandler { kind: HandlerKind, code: String },

    #[error("No default message handler registered")]
    NoDefaultHandler,

    #[error("Unknown message handler code: {0}")]
    UnknownMessageHandler(String),

    #[error("Unknown postback payload code: {0}")]
    UnknownPostback(String),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DispatchError {
    /// Short stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::DuplicateHandler { .. } => "duplicate_handler",
            DispatchError::NoDefaultHandler => "no_default_handler",
            DispatchError::UnknownMessageHandler(_) => "unknown_message_handler",
            DispatchError::UnknownPostback(_) => "unknown_postback",
            DispatchError::Handler(_) => "handler",
            DispatchError::Delivery(_) => "delivery",
            DispatchError::Store(_) => "store",
        }
    }
}

/// Failure reported by a [`crate::DeliveryChannel`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Platform rejected message: status={status}, body={body}")]
    Platform { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Failure reported by a [`crate::SessionStore`] or [`crate::AuditLog`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
