//! Row of the `user_sessions` table.

use chrono::{DateTime, Utc};
use messenger_core::UserSession;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionRecord {
    pub user_id: String,
    pub next_handler: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<SessionRecord> for UserSession {
    fn from(record: SessionRecord) -> Self {
        UserSession {
            user_id: record.user_id,
            next_handler: record.next_handler,
            updated_at: record.updated_at,
        }
    }
}
