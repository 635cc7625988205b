//! # Portal Security
//! 
//! Security utilities: password hashing and session token signing.

pub mod password;
pub mod session;

pub use password::PasswordService;
pub use session::SessionSigner;
