//! Error types for finance domain validation.

use super::ids::WithdrawId;
use super::withdraw::WithdrawStatus;
use crate::registry::domain::Principal;
use thiserror::Error;

/// Errors returned while constructing or mutating finance domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FinanceDomainError {
    /// The fee shares do not sum to exactly 100%.
    #[error("fee shares sum to {0} basis points, expected 10000")]
    InvalidFeeSchedule(u32),

    /// A monetary computation exceeded the representable range.
    #[error("monetary amount overflows the settlement range")]
    AmountOverflow,

    /// A zero amount was supplied where a positive amount is required.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// The partner balance cannot cover the requested amount.
    #[error("partner {partner} has {available} available, {requested} requested")]
    InsufficientFunds {
        /// Partner whose balance was checked.
        partner: Principal,
        /// Amount requested.
        requested: u64,
        /// Amount currently available.
        available: u64,
    },

    /// The withdrawal request has already been resolved.
    #[error("withdrawal {withdraw_id} is already {status}")]
    AlreadyResolved {
        /// Target withdrawal request.
        withdraw_id: WithdrawId,
        /// Status the request held when the resolution was attempted.
        status: WithdrawStatus,
    },
}

/// Error returned while parsing withdrawal statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown withdrawal status: {0}")]
pub struct ParseWithdrawStatusError(pub String);
