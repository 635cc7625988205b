//! Session domain types
//!
//! A request is either [`SessionState::Anonymous`] or
//! [`SessionState::Authenticated`]. Expired and destroyed sessions are not
//! represented: both resolve back to `Anonymous`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use portal_shared::EntityId;

use super::user::{Role, User};

/// Server-side session record, stored under the session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub authenticated: bool,
    pub user_id: EntityId,
    pub email: String,
    pub name: String,
    /// Captured at login; not refreshed if the stored role changes later.
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn for_user(user: &User, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            authenticated: true,
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub id: String,
    pub record: SessionRecord,
}

impl ActiveSession {
    pub fn is_admin(&self) -> bool {
        self.record.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(ActiveSession),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Anonymous => None,
        }
    }

    pub fn into_active(self) -> Option<ActiveSession> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            SessionState::Anonymous => None,
        }
    }
}
