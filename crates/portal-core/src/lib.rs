//! # Portal Core
//! 
//! Domain entities, services, and store traits for the members portal.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

#[cfg(test)]
mod test_support;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
