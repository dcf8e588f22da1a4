//! Audit entry model for persistence.
//!
//! Maps to the `request_responses` table and is used by AuditRepository.

use chrono::{DateTime, Utc};
use messenger_core::AuditRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: String,
    pub user_id: String,
    pub request_type: String,
    pub request_message: Option<String>,
    pub postback_type: Option<String>,
    pub response_text: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates an entry with a generated UUID and the current timestamp.
    pub fn new(record: &AuditRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: record.user_id.clone(),
            request_type: record.request_type.clone(),
            request_message: record.request_message.clone(),
            postback_type: record.postback_type.clone(),
            response_text: record.response_text.clone(),
            created_at: Utc::now(),
        }
    }
}
