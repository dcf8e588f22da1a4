//! In-memory session store for tests and local runs. Data is lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use messenger_core::{SessionStore, StoreError, UserSession};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, UserSession>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_session(&self, user_id: &str) -> Option<UserSession> {
        self.sessions.read().await.get(user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of `set_next_handler` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_next_handler(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(user_id)
            .and_then(|s| s.next_handler.clone()))
    }

    async fn set_next_handler(&self, user_id: &str, code: Option<&str>) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.sessions.write().await.insert(
            user_id.to_string(),
            UserSession {
                user_id: user_id.to_string(),
                next_handler: code.map(str::to_string),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_user_has_no_code() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get_next_handler("u1").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_then_clear() {
        let store = InMemorySessionStore::new();
        store.set_next_handler("u1", Some("ASK")).await.unwrap();
        assert_eq!(
            store.get_next_handler("u1").await.unwrap().as_deref(),
            Some("ASK")
        );

        store.set_next_handler("u1", None).await.unwrap();
        assert_eq!(store.get_next_handler("u1").await.unwrap(), None);
        // The session row stays; only the override is cleared.
        assert!(store.get_session("u1").await.is_some());
        assert_eq!(store.len().await, 1);
        assert_eq!(store.write_count(), 2);
    }
}
