//! In-process stores for local development and tests.
//!
//! Nothing here survives a restart.

pub mod session_store;
pub mod user_store;

pub use session_store::MemorySessionStore;
pub use user_store::MemoryUserRepository;
