// ============================================================================
// Portal API - Auth Handlers
// File: crates/portal-api/src/handlers/auth.rs
// ============================================================================
//! Signup, login and logout form handlers

use axum::{
    extract::{Form, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};

use portal_core::domain::{LoginInput, SignupInput};

use crate::error::ApiError;
use crate::middleware::{clear_session_cookie, session_cookie, SessionToken};
use crate::state::AppState;

/// POST /signupSubmit
pub async fn signup_submit(
    State(state): State<AppState>,
    SessionToken(previous): SessionToken,
    Form(input): Form<SignupInput>,
) -> Result<Response, ApiError> {
    let issued = state.auth.signup(&input, previous.as_deref()).await?;
    let cookie = session_cookie(&state.cookie, &issued.token)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/members")).into_response())
}

/// POST /loginSubmit
pub async fn login_submit(
    State(state): State<AppState>,
    SessionToken(previous): SessionToken,
    Form(input): Form<LoginInput>,
) -> Result<Response, ApiError> {
    let issued = state.auth.login(&input, previous.as_deref()).await?;
    let cookie = session_cookie(&state.cookie, &issued.token)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/members")).into_response())
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Response, ApiError> {
    state.auth.logout(token.as_deref()).await?;
    let cookie = clear_session_cookie(&state.cookie)?;
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}
