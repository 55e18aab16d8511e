//! Application services for partner withdrawals.

mod withdraw;

pub use withdraw::{WithdrawError, WithdrawResult, WithdrawService};
