//! Audit repository: one row per handled request and the reply sent for it.

use async_trait::async_trait;
use messenger_core::{AuditLog, AuditRecord, StoreError};
use tracing::{debug, info};

use crate::models::AuditEntry;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct AuditRepository {
    pool_manager: SqlitePoolManager,
}

impl AuditRepository {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, sqlx::Error> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating request_responses table if not exists");
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS request_responses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                request_type TEXT NOT NULL,
                request_message TEXT,
                postback_type TEXT,
                response_text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_request_responses_user_id ON request_responses(user_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, entry: &AuditEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO request_responses (id, user_id, request_type, request_message, postback_type, response_text, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.request_type)
        .bind(&entry.request_message)
        .bind(&entry.postback_type)
        .bind(&entry.response_text)
        .bind(entry.created_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(
            id = %entry.id,
            user_id = %entry.user_id,
            request_type = %entry.request_type,
            "Saved audit entry"
        );
        Ok(())
    }

    /// Most recent entries of one user, newest first.
    pub async fn get_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM request_responses WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(entries)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM request_responses")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(total.0)
    }
}

#[async_trait]
impl AuditLog for AuditRepository {
    async fn record(&self, record: &AuditRecord) -> Result<(), StoreError> {
        self.save(&AuditEntry::new(record))
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
