//! User registry and approval workflow.
//!
//! The registry binds each external principal to exactly one platform role
//! and an approval status, and is the sole source of truth for every
//! authorization check in the system. Registration arrives through the
//! client, partner and internal self-service paths or through the
//! admin-registration path; pending registrations move to active or
//! rejected through the approval workflow; the one-time superadmin claim is
//! a single irreversible global transition. The module follows hexagonal
//! architecture:
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
