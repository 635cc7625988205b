//! # Portal Core - Domain Module
//! 
//! Domain entities for the members portal.

pub mod user;
pub mod session;
pub mod credentials;

// Re-export all entities and enums
pub use user::{User, Role};
pub use session::{ActiveSession, SessionRecord, SessionState};
pub use credentials::{LoginInput, SignupInput};
