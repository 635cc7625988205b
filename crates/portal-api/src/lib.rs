//! # Portal API
//! 
//! HTTP handlers, session guards, views and the router.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod views;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, CookieSettings};
pub use views::Views;
