//! Port contracts for the user registry.
//!
//! Ports define infrastructure-agnostic interfaces used by registry
//! services.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
