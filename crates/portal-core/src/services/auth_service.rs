// ============================================================================
// Portal Core - Authentication Service
// File: crates/portal-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service with signup, login and logout flows

use std::sync::Arc;
use tracing::{info, warn, error};

use portal_security::password::{PasswordError, PasswordService};
use portal_shared::utils::mask_email;

use crate::domain::{LoginInput, SignupInput, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;
use crate::services::session_service::{IssuedSession, SessionManager};

/// Authentication service for handling signup/login flows
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
    passwords: PasswordService,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        sessions: Arc<SessionManager>,
        passwords: PasswordService,
    ) -> Self {
        Self {
            user_repo,
            sessions,
            passwords,
        }
    }

    /// Register a new user and sign them in.
    ///
    /// As with [`login`](Self::login), `previous_token` is destroyed once the
    /// account exists, so no earlier identity outlives the signup.
    pub async fn signup(
        &self,
        input: &SignupInput,
        previous_token: Option<&str>,
    ) -> Result<IssuedSession, DomainError> {
        info!("Signup attempt for email: {}", mask_email(&input.email));

        // 1. Validate presence, then shape
        input.check()?;

        // 2. Hash password
        let password_hash = self
            .passwords
            .hash_async(input.password.clone())
            .await
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        // 3. Save user (role = user)
        let user = User::new(input.name.clone(), input.email.clone(), password_hash);
        let created = self.user_repo.insert(&user).await?;

        // 4. Replace any session the request came with, then sign in
        if let Some(token) = previous_token {
            self.sessions.destroy(token).await?;
        }
        let issued = self.sessions.issue(&created).await?;

        info!("Signup successful for: {}", mask_email(&created.email));
        Ok(issued)
    }

    /// Login with email and password.
    ///
    /// `previous_token` is the session token the request arrived with, if
    /// any; it is destroyed once the credentials check out so the caller
    /// always ends up with a fresh session id.
    pub async fn login(
        &self,
        input: &LoginInput,
        previous_token: Option<&str>,
    ) -> Result<IssuedSession, DomainError> {
        let masked = mask_email(&input.email);
        info!("Login attempt for email: {}", masked);

        // 1. Validate input
        input.check()?;

        // 2. Find exactly one user by email
        let mut matches = self.user_repo.find_by_email(&input.email).await?;
        let user = match matches.len() {
            0 => {
                warn!("Login failed: email not found: {}", masked);
                return Err(DomainError::InvalidCredentials);
            }
            1 => matches.remove(0),
            n => {
                error!("Login refused: {} accounts share email {}", n, masked);
                return Err(DomainError::DuplicateAccount(masked));
            }
        };

        // 3. Verify password
        let password_valid =
            PasswordService::verify_async(input.password.clone(), user.password_hash.clone())
                .await
                .map_err(|e| match e {
                    PasswordError::HashError(msg) => {
                        warn!("Stored hash for user {} is unusable: {}", user.id, msg);
                        DomainError::InvalidCredentials
                    }
                    PasswordError::TaskFailed(msg) => DomainError::InternalError(msg),
                })?;

        if !password_valid {
            warn!("Login failed: invalid password for: {}", masked);
            return Err(DomainError::InvalidCredentials);
        }

        // 4. Replace any session the request came with
        if let Some(token) = previous_token {
            self.sessions.destroy(token).await?;
        }
        let issued = self.sessions.issue(&user).await?;

        info!("Login successful for: {}", masked);
        Ok(issued)
    }

    /// Destroy the current session, if any.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), DomainError> {
        if let Some(token) = token {
            self.sessions.destroy(token).await?;
        }
        Ok(())
    }
}
