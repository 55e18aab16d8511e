//! Service balance ledger.
//!
//! Clients purchase layanan packages denominated in billing units, each
//! worth two effective hours. Task creation reserves hours onto hold, task
//! completion burns them, and abandoned reservations release back to the
//! available pool. The balance record is the only contended-write resource
//! in the system, so all three mutations are atomic repository operations.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
