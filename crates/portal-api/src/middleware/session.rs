// ============================================================================
// Portal API - Session Middleware
// File: crates/portal-api/src/middleware/session.rs
// ============================================================================
//! Cookie handling and session resolution for requests.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::COOKIE, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use portal_core::domain::{ActiveSession, SessionState};

use crate::error::ApiError;
use crate::state::{AppState, CookieSettings};

/// Read the session token from the `Cookie` header.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next().unwrap_or_default().trim();
            let val = parts.next().unwrap_or_default().trim();
            if key == cookie_name && !val.is_empty() {
                return Some(val.to_string());
            }
        }
    }
    None
}

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(settings: &CookieSettings, token: &str) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.name, token, settings.max_age_seconds
    );
    if settings.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::InternalError(e.to_string()))
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(settings: &CookieSettings) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", settings.name);
    if settings.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::InternalError(e.to_string()))
}

/// The raw session token presented with the request, unverified.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(SessionToken(session_token(&parts.headers, &state.cookie.name)))
    }
}

/// The authenticated session, if there is one. Never rejects anonymous
/// requests; store failures still surface.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<ActiveSession>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<ActiveSession>() {
            return Ok(OptionalSession(Some(session.clone())));
        }
        let token = session_token(&parts.headers, &state.cookie.name);
        let resolved = state.sessions.resolve(token.as_deref()).await?;
        Ok(OptionalSession(resolved.into_active()))
    }
}

/// Let authenticated requests through with their [`ActiveSession`]
/// attached; send everyone else to the login form.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(request.headers(), &state.cookie.name);

    match state.sessions.resolve(token.as_deref()).await? {
        SessionState::Authenticated(session) => {
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        SessionState::Anonymous => {
            debug!("Anonymous request to {}, redirecting to login", request.uri().path());
            Ok(Redirect::to("/login").into_response())
        }
    }
}
