//! Admin-facing user management

use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{Role, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Promote,
    Demote,
}

impl RoleChange {
    pub fn target_role(&self) -> Role {
        match self {
            RoleChange::Promote => Role::Admin,
            RoleChange::Demote => Role::User,
        }
    }
}

impl FromStr for RoleChange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promote" => Ok(RoleChange::Promote),
            "demote" => Ok(RoleChange::Demote),
            other => Err(DomainError::ValidationError(format!("Unknown action '{}'.", other))),
        }
    }
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.user_repo.list_all().await
    }

    /// Change a user's role, addressed by name.
    ///
    /// Sessions already issued to that user keep the role they were created
    /// with until they expire or the user logs in again.
    pub async fn change_role(&self, name: &str, change: RoleChange) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::ValidationError("Name is required.".to_string()));
        }

        let role = change.target_role();
        if !self.user_repo.update_role(name, role).await? {
            warn!("Role change to {} skipped: no user named {}", role.as_str(), name);
            return Err(DomainError::UserNotFound(name.to_string()));
        }

        info!("User {} is now {}", name, role.as_str());
        Ok(())
    }
}
