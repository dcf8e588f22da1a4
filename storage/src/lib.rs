//! Storage crate: session and audit persistence.
//!
//! ## Modules
//!
//! - [`models`] – SessionRecord, AuditEntry
//! - `session_repo` – SessionRepository (SQLite [`messenger_core::SessionStore`])
//! - `audit_repo` – AuditRepository (SQLite [`messenger_core::AuditLog`])
//! - `inmemory` – InMemorySessionStore
//! - `sqlite_pool` – SqlitePoolManager

mod audit_repo;
mod inmemory;
pub mod models;
mod session_repo;
mod sqlite_pool;

pub use audit_repo::AuditRepository;
pub use inmemory::InMemorySessionStore;
pub use models::{AuditEntry, SessionRecord};
pub use session_repo::SessionRepository;
pub use sqlite_pool::SqlitePoolManager;
