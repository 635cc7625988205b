//! Page handlers (landing, forms, members area, 404)

use axum::{
    extract::{Extension, State},
    response::Html,
};
use rand::seq::IndexedRandom;
use serde::Serialize;
use serde_json::json;

use portal_core::domain::ActiveSession;

use crate::error::ApiError;
use crate::middleware::OptionalSession;
use crate::state::AppState;

#[derive(Serialize)]
struct IndexContext<'a> {
    authenticated: bool,
    name: Option<&'a str>,
    is_admin: bool,
}

#[derive(Serialize)]
struct MembersContext<'a> {
    name: &'a str,
    image: Option<&'a str>,
}

/// GET /
pub async fn index(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
) -> Result<Html<String>, ApiError> {
    let context = IndexContext {
        authenticated: session.is_some(),
        name: session.as_ref().map(|s| s.record.name.as_str()),
        is_admin: session.as_ref().is_some_and(|s| s.is_admin()),
    };
    state.views.render("index", &context)
}

/// GET /signup
pub async fn signup_form(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.views.render("signup", &json!({}))
}

/// GET /login
pub async fn login_form(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.views.render("login", &json!({}))
}

/// GET /members
pub async fn members(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
) -> Result<Html<String>, ApiError> {
    let image = state.member_images.choose(&mut rand::rng());
    let context = MembersContext {
        name: &session.record.name,
        image: image.map(String::as_str),
    };
    state.views.render("members", &context)
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found.".to_string())
}
