//! Role guard for admin routes

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;

use portal_core::domain::ActiveSession;

use crate::error::ApiError;

/// Admit only admin sessions. Must sit inside
/// [`require_session`](super::require_session); without an attached
/// session the request is sent to the login form.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let Some(session) = request.extensions().get::<ActiveSession>() else {
        return Ok(Redirect::to("/login").into_response());
    };

    if !session.is_admin() {
        warn!(
            "User {} ({}) denied access to {}",
            session.record.name,
            session.record.role.as_str(),
            request.uri().path()
        );
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
