use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use portal_core::domain::{Role, User};
use portal_core::error::DomainError;
use portal_core::repositories::UserRepository;
use portal_shared::EntityId;

/// Users keyed by id. Emails are not unique, same as the SQL schema.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<DashMap<EntityId, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        info!("Initializing in-memory user repository");
        Self::default()
    }

    fn sorted(mut users: Vec<User>) -> Vec<User> {
        users.sort_by_key(|u| u.created_at);
        users
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DomainError> {
        let found = self
            .users
            .iter()
            .filter(|entry| entry.email == email)
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::sorted(found))
    }

    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        let all = self.users.iter().map(|entry| entry.value().clone()).collect();
        Ok(Self::sorted(all))
    }

    async fn update_role(&self, name: &str, role: Role) -> Result<bool, DomainError> {
        // Pick the target before taking a write guard; iter() holds read locks.
        let target = self
            .users
            .iter()
            .filter(|entry| entry.name == name)
            .min_by_key(|entry| entry.created_at)
            .map(|entry| *entry.key());

        let Some(id) = target else {
            return Ok(false);
        };
        match self.users.get_mut(&id) {
            Some(mut user) => {
                user.change_role(role);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
