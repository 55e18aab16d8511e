//! `PostgreSQL` adapters for finance persistence.

mod models;
mod repository;
mod schema;

pub use repository::{FinancePgPool, PostgresFinanceRepository};
