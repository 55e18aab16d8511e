//! Domain model for financial settlement and partner withdrawals.

mod error;
mod fees;
mod ids;
mod settlement;
mod withdraw;

pub use error::{FinanceDomainError, ParseWithdrawStatusError};
pub use fees::{FeeBreakdown, FeeSchedule};
pub use ids::WithdrawId;
pub use settlement::{FinancialResult, PersistedFinancialResult};
pub use withdraw::{
    PersistedWithdrawData, WithdrawRequest, WithdrawResolution, WithdrawStatus,
};
