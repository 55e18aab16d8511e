//! Task delegation lifecycle.
//!
//! Tasks are the unit of work clients raise against their layanan balance.
//! Each task walks a fixed status graph: requested by the client, estimated
//! by internal staff, estimate-approved by the client, delegated to a
//! partner, worked through QA and client review, and finally completed —
//! at which point the reserved hours burn and the financial settlement
//! runs. The module follows hexagonal architecture:
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
