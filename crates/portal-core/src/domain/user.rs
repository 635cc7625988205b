//! User domain entity

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_shared::{new_id, EntityId};

use crate::error::DomainError;

/// Coarse authorization tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::ValidationError(format!("Unknown role '{}'.", other))),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl User {
    /// New accounts always start with [`Role::User`].
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: new_id(),
            name,
            email,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn change_role(&mut self, role: Role) {
        self.role = role;
        self.modified_at = Some(Utc::now());
    }
}
