//! Credential store trait (port)

use async_trait::async_trait;

use crate::domain::{Role, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<User, DomainError>;

    /// Email is not unique at the storage level, so callers must handle
    /// zero, one, or several matches.
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DomainError>;

    async fn list_all(&self) -> Result<Vec<User>, DomainError>;

    /// Sets the role of the first user (by creation time) named `name`.
    /// Returns `false` when nobody has that name.
    async fn update_role(&self, name: &str, role: Role) -> Result<bool, DomainError>;
}
