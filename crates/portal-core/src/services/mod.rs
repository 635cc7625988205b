//! Domain services (business logic)

pub mod auth_service;
pub mod session_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use session_service::{IssuedSession, SessionManager};
pub use user_service::{RoleChange, UserService};
