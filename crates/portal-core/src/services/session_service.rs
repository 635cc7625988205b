// ============================================================================
// Portal Core - Session Manager
// File: crates/portal-core/src/services/session_service.rs
// ============================================================================
//! Issues, resolves and destroys signed sessions backed by a [`SessionStore`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use portal_security::SessionSigner;

use crate::domain::{ActiveSession, SessionRecord, SessionState, User};
use crate::error::DomainError;
use crate::repositories::SessionStore;

/// A freshly created session and the signed token to hand to the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: ActiveSession,
}

pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: SessionSigner,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, signer: SessionSigner, ttl: Duration) -> Self {
        Self { store, signer, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create an authenticated session for `user`.
    pub async fn issue(&self, user: &User) -> Result<IssuedSession, DomainError> {
        let session_id = SessionSigner::generate_id();
        let record = SessionRecord::for_user(user, Utc::now(), self.ttl);

        self.store.save(&session_id, &record).await?;
        debug!("Issued session for user {} (expires {})", user.id, record.expires_at);

        Ok(IssuedSession {
            token: self.signer.sign(&session_id),
            session: ActiveSession {
                id: session_id,
                record,
            },
        })
    }

    /// Resolve the token presented with a request.
    ///
    /// Every failure mode other than a store error is `Anonymous`.
    pub async fn resolve(&self, token: Option<&str>) -> Result<SessionState, DomainError> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SessionState, DomainError> {
        let Some(token) = token else {
            return Ok(SessionState::Anonymous);
        };
        let Some(session_id) = self.signer.verify(token) else {
            debug!("Rejected session token with invalid signature");
            return Ok(SessionState::Anonymous);
        };
        let Some(record) = self.store.load(&session_id).await? else {
            return Ok(SessionState::Anonymous);
        };

        if record.is_expired_at(now) {
            self.store.destroy(&session_id).await?;
            debug!("Session for user {} expired at {}", record.user_id, record.expires_at);
            return Ok(SessionState::Anonymous);
        }
        if !record.authenticated {
            return Ok(SessionState::Anonymous);
        }

        Ok(SessionState::Authenticated(ActiveSession {
            id: session_id,
            record,
        }))
    }

    /// Destroy the session behind `token`. Returns `false` for tokens that
    /// fail signature checks; unknown ids are still deleted (a no-op).
    pub async fn destroy(&self, token: &str) -> Result<bool, DomainError> {
        let Some(session_id) = self.signer.verify(token) else {
            return Ok(false);
        };
        self.store.destroy(&session_id).await?;
        info!("Session destroyed");
        Ok(true)
    }
}
