// ============================================================================
// Portal API - Error Responses
// File: crates/portal-api/src/error.rs
// ============================================================================
//! Request-level errors.
//!
//! `ApiError` produces a plain-text response tagged with an [`ErrorPage`]
//! extension; [`render_error_pages`](crate::middleware::render_error_pages)
//! swaps the body for the matching HTML view.

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use portal_core::error::DomainError;
use portal_shared::constants::STORE_RETRY_AFTER_SECONDS;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email/password combination.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Which view renders an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTemplate {
    /// Form feedback with a "try again" link.
    Message,
    /// Standalone status page.
    Error,
}

impl ErrorTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorTemplate::Message => "message",
            ErrorTemplate::Error => "error",
        }
    }
}

/// Attached to error responses as an extension.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub template: ErrorTemplate,
    pub status: StatusCode,
    pub title: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the user gets to see. Infrastructure details stay in the logs.
    fn page(&self) -> ErrorPage {
        let status = self.status();
        let (template, title, message) = match self {
            ApiError::Validation(msg) => (ErrorTemplate::Message, "Invalid input", msg.clone()),
            ApiError::Unauthorized(msg) => (ErrorTemplate::Message, "Login failed", msg.clone()),
            ApiError::Forbidden => (
                ErrorTemplate::Error,
                "Forbidden",
                "You are not authorized to view this page.".to_string(),
            ),
            ApiError::NotFound(msg) => (ErrorTemplate::Error, "Not Found", msg.clone()),
            ApiError::ServiceUnavailable(_) => (
                ErrorTemplate::Error,
                "Service Unavailable",
                "The service is temporarily unavailable. Please try again shortly.".to_string(),
            ),
            ApiError::InternalError(_) => (
                ErrorTemplate::Error,
                "Internal Server Error",
                "Something went wrong.".to_string(),
            ),
        };
        ErrorPage {
            template,
            status,
            title,
            message,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => ApiError::Validation(msg),
            DomainError::InvalidCredentials | DomainError::DuplicateAccount(_) => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            DomainError::Forbidden => ApiError::Forbidden,
            DomainError::UserNotFound(name) => ApiError::NotFound(format!("No user named {}.", name)),
            DomainError::StoreUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            DomainError::PasswordHashError(msg) | DomainError::InternalError(msg) => {
                ApiError::InternalError(msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(msg) => tracing::debug!("Validation failed: {}", msg),
            ApiError::Unauthorized(msg) => tracing::warn!("Unauthorized: {}", msg),
            ApiError::Forbidden => tracing::warn!("Forbidden"),
            ApiError::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            ApiError::ServiceUnavailable(msg) => tracing::error!("Service unavailable: {}", msg),
            ApiError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
        }

        let page = self.page();
        let mut response = (page.status, page.message.clone()).into_response();
        if matches!(self, ApiError::ServiceUnavailable(_)) {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(STORE_RETRY_AFTER_SECONDS));
        }
        response.extensions_mut().insert(page);
        response
    }
}
