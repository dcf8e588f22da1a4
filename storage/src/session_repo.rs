//! Session repository: per-user next handler code in SQLite.
//!
//! Implements [`SessionStore`] with an upsert keyed by `user_id`. Rows are never deleted here.

use async_trait::async_trait;
use chrono::Utc;
use messenger_core::{SessionStore, StoreError, UserSession};
use tracing::{debug, info};

use crate::models::SessionRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SessionRepository {
    pool_manager: SqlitePoolManager,
}

impl SessionRepository {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Uses an existing pool (e.g. shared with [`crate::AuditRepository`]).
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, sqlx::Error> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), sqlx::Error> {
        info!("Creating user_sessions table if not exists");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_sessions (
                user_id TEXT PRIMARY KEY,
                next_handler TEXT,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    pub async fn get_session(&self, user_id: &str) -> Result<Option<UserSession>, sqlx::Error> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT user_id, next_handler, updated_at FROM user_sessions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(record.map(UserSession::from))
    }

    pub async fn upsert(&self, user_id: &str, next_handler: Option<&str>) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, next_handler, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                next_handler = excluded.next_handler,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(next_handler)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        debug!(user_id = %user_id, next_handler = ?next_handler, "Upserted session");
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_sessions")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(total.0)
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn get_next_handler(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let session = self
            .get_session(user_id)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(session.and_then(|s| s.next_handler))
    }

    async fn set_next_handler(&self, user_id: &str, code: Option<&str>) -> Result<(), StoreError> {
        self.upsert(user_id, code)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
