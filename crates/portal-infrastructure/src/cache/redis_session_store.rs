// ============================================================================
// Portal Infrastructure - Redis Session Store
// File: crates/portal-infrastructure/src/cache/redis_session_store.rs
// ============================================================================
//! Session records as JSON strings under `<prefix>:session:<id>`, with a
//! Redis TTL matching the record's expiry.

use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use tracing::{debug, error, warn};

use portal_core::domain::SessionRecord;
use portal_core::error::DomainError;
use portal_core::repositories::SessionStore;
use portal_shared::config::RedisSettings;

pub struct RedisSessionStore {
    pool: Pool,
    key_prefix: String,
}

impl RedisSessionStore {
    pub fn new(pool: Pool, key_prefix: impl Into<String>) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.into(),
        }
    }

    /// Build the pool lazily; no connection is opened until first use.
    pub fn from_settings(settings: &RedisSettings) -> Result<Self, DomainError> {
        let mut config = Config::from_url(settings.url.clone());
        config.pool = Some(PoolConfig::new(settings.max_connections));
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::StoreUnavailable(format!("redis pool: {}", e)))?;
        Ok(Self::new(pool, settings.key_prefix.clone()))
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}:session:{}", self.key_prefix, session_id)
    }

    async fn connection(&self) -> Result<Connection, DomainError> {
        self.pool.get().await.map_err(|e| {
            error!("Redis pool error: {}", e);
            DomainError::StoreUnavailable(e.to_string())
        })
    }
}

fn redis_error(context: &str, e: deadpool_redis::redis::RedisError) -> DomainError {
    error!("Redis error {}: {}", context, e);
    DomainError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session_id: &str, record: &SessionRecord) -> Result<(), DomainError> {
        let ttl = record.remaining_seconds(Utc::now());
        if ttl == 0 {
            return self.destroy(session_id).await;
        }

        let payload = serde_json::to_string(record)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(self.key(session_id), payload, ttl as u64)
            .await
            .map_err(|e| redis_error("saving session", e))?;

        debug!("Stored session record with ttl {}s", ttl);
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(self.key(session_id))
            .await
            .map_err(|e| redis_error("loading session", e))?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // Unreadable records are treated as absent.
                warn!("Discarding unreadable session record: {}", e);
                Ok(None)
            }
        }
    }

    async fn destroy(&self, session_id: &str) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(self.key(session_id))
            .await
            .map_err(|e| redis_error("destroying session", e))?;
        Ok(())
    }
}
