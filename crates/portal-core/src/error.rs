//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// More than one user shares the email; never a valid login.
    #[error("Multiple accounts registered for {0}")]
    DuplicateAccount(String),

    #[error("Insufficient role")]
    Forbidden,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Infrastructure failures the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable(_))
    }
}
