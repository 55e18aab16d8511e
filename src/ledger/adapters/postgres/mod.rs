//! `PostgreSQL` adapters for layanan ledger persistence.

mod models;
mod repository;
mod schema;

pub use repository::{LedgerPgPool, PostgresLayananRepository};
