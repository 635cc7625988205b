use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use portal_core::domain::SessionRecord;
use portal_core::error::DomainError;
use portal_core::repositories::SessionStore;

/// Session records keyed by session id.
/// Expired records are dropped on read and by [`MemorySessionStore::cleanup_expired`].
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<DashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        info!("Initializing in-memory session store");
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove every expired record, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired_at(now));
        let removed = before.saturating_sub(self.records.len());
        if removed > 0 {
            debug!("Swept {} expired sessions", removed);
        }
        removed
    }

    /// Run [`cleanup_expired`](Self::cleanup_expired) on a fixed period.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.cleanup_expired();
            }
        })
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session_id: &str, record: &SessionRecord) -> Result<(), DomainError> {
        self.records.insert(session_id.to_string(), record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        let Some(entry) = self.records.get(session_id) else {
            return Ok(None);
        };
        let record = entry.value().clone();

        if record.is_expired_at(Utc::now()) {
            drop(entry); // release the shard lock before removing
            self.records.remove(session_id);
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn destroy(&self, session_id: &str) -> Result<(), DomainError> {
        self.records.remove(session_id);
        Ok(())
    }
}
