//! Application services for the service balance ledger.

mod balance;

pub use balance::{ActivateServiceRequest, BalanceError, BalanceResult, BalanceService};
