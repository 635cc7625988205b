//! Session guards, extractors and the error page layer

pub mod admin;
pub mod error_pages;
pub mod session;

pub use admin::require_admin;
pub use error_pages::render_error_pages;
pub use session::{
    clear_session_cookie, require_session, session_cookie, session_token, OptionalSession,
    SessionToken,
};
