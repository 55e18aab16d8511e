//! Financial settlement and partner withdrawals.
//!
//! Completed tasks settle against the configured fee schedule: the
//! settlement value splits into platform, partner and referral shares, the
//! partner share accrues to the partner's balance, and partners draw the
//! balance down through finance-approved withdrawal requests. The module
//! follows hexagonal architecture:
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
