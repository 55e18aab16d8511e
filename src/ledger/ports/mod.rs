//! Port contracts for the service balance ledger.
//!
//! Ports define infrastructure-agnostic interfaces used by ledger services.

pub mod repository;

pub use repository::{LayananRepository, LayananRepositoryError, LayananRepositoryResult};
