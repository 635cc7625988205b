use std::path::PathBuf;
use std::sync::Arc;

use portal_core::services::{AuthService, SessionManager, UserService};
use portal_shared::config::SessionSettings;

use crate::views::Views;

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
    pub max_age_seconds: i64,
}

impl CookieSettings {
    pub fn from_config(settings: &SessionSettings) -> Self {
        Self {
            name: settings.cookie_name.clone(),
            secure: settings.cookie_secure,
            max_age_seconds: settings.ttl_seconds(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub sessions: Arc<SessionManager>,
    pub views: Arc<Views>,
    pub cookie: CookieSettings,
    pub public_dir: PathBuf,
    /// File names under `public_dir` the members page picks from.
    pub member_images: Arc<Vec<String>>,
}
