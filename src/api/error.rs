//! Facade-level error type for the engine.

use crate::finance::services::WithdrawError;
use crate::ledger::services::BalanceError;
use crate::registry::domain::Principal;
use crate::registry::services::{ApprovalError, RegistrationError};
use crate::task::services::TaskLifecycleError;
use thiserror::Error;

/// Errors returned by the engine facade.
///
/// Business-rule violations always arrive as typed values through the
/// wrapped service errors; the only variant added at this layer is the
/// authorization gate. Infrastructure failures surface through the
/// repository `Persistence` variants inside the wrapped errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller lacks the role or approval status the operation
    /// requires.
    #[error("caller {caller} is not authorized to {action}")]
    Unauthorized {
        /// Principal that attempted the operation.
        caller: Principal,
        /// Human-readable name of the gated operation.
        action: &'static str,
    },

    /// Registration path failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Approval workflow failed.
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    /// Service ledger operation failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Task lifecycle operation failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),

    /// Withdrawal operation failed.
    #[error(transparent)]
    Withdraw(#[from] WithdrawError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
