//! Session store trait (port)

use async_trait::async_trait;

use crate::domain::SessionRecord;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert or replace. Backends may evict the record once
    /// `record.expires_at` has passed.
    async fn save(&self, session_id: &str, record: &SessionRecord) -> Result<(), DomainError>;

    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError>;

    async fn destroy(&self, session_id: &str) -> Result<(), DomainError>;
}
