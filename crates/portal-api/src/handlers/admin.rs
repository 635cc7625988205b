//! Admin handlers: user list and role changes

use axum::{
    extract::{Extension, Form, State},
    response::{Html, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use portal_core::domain::{ActiveSession, User};
use portal_core::services::RoleChange;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
struct UserRow<'a> {
    name: &'a str,
    email: &'a str,
    role: &'static str,
    is_admin: bool,
}

impl<'a> From<&'a User> for UserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            email: &user.email,
            role: user.role.as_str(),
            is_admin: user.is_admin(),
        }
    }
}

#[derive(Serialize)]
struct AdminContext<'a> {
    users: Vec<UserRow<'a>>,
}

#[derive(Debug, Deserialize)]
pub struct RoleChangeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub action: String,
}

/// GET /admin
pub async fn admin_page(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
) -> Result<Html<String>, ApiError> {
    let users = state.users.list_users().await?;
    info!("Admin {} listed {} users", session.record.name, users.len());

    let context = AdminContext {
        users: users.iter().map(UserRow::from).collect(),
    };
    state.views.render("admin", &context)
}

/// POST /users
pub async fn change_role(
    State(state): State<AppState>,
    Extension(session): Extension<ActiveSession>,
    Form(form): Form<RoleChangeForm>,
) -> Result<Redirect, ApiError> {
    let change: RoleChange = form.action.parse()?;

    info!("Admin {} requested {:?} for {}", session.record.name, change, form.name);
    state.users.change_role(&form.name, change).await?;
    Ok(Redirect::to("/admin"))
}
