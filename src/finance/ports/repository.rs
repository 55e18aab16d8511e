//! Repository port for settlement records, partner balances and
//! withdrawal requests.

use crate::finance::domain::{FinanceDomainError, FinancialResult, WithdrawId, WithdrawRequest};
use crate::registry::domain::Principal;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for finance repository operations.
pub type FinanceRepositoryResult<T> = Result<T, FinanceRepositoryError>;

/// Finance persistence contract.
///
/// Balance credit and debit are atomic repository operations: the debit
/// re-checks the available balance inside its guarded section so two
/// concurrent approvals can never overdraw a partner.
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    /// Records a settlement, at most once per task.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceRepositoryError::AlreadySettled`] when a settlement
    /// for the task already exists.
    async fn record_settlement(&self, result: &FinancialResult) -> FinanceRepositoryResult<()>;

    /// Finds the settlement recorded for a task.
    ///
    /// Returns `None` when the task has not settled.
    async fn find_settlement(
        &self,
        task_id: TaskId,
    ) -> FinanceRepositoryResult<Option<FinancialResult>>;

    /// Atomically credits a partner balance, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceRepositoryError::Domain`] carrying
    /// [`FinanceDomainError::AmountOverflow`] when the credit would exceed
    /// the monetary range.
    async fn credit_partner(
        &self,
        partner: &Principal,
        amount: u64,
    ) -> FinanceRepositoryResult<u64>;

    /// Atomically debits a partner balance, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceRepositoryError::Domain`] carrying
    /// [`FinanceDomainError::InsufficientFunds`] when the balance cannot
    /// cover the amount.
    async fn debit_partner(&self, partner: &Principal, amount: u64)
    -> FinanceRepositoryResult<u64>;

    /// Returns a partner's current balance (zero when never credited).
    async fn partner_balance(&self, partner: &Principal) -> FinanceRepositoryResult<u64>;

    /// Stores a new withdrawal request.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceRepositoryError::DuplicateWithdraw`] when the ID
    /// already exists.
    async fn store_withdraw(&self, request: &WithdrawRequest) -> FinanceRepositoryResult<()>;

    /// Persists changes to an existing withdrawal request.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceRepositoryError::WithdrawNotFound`] when the
    /// request does not exist.
    async fn update_withdraw(&self, request: &WithdrawRequest) -> FinanceRepositoryResult<()>;

    /// Finds a withdrawal request by identifier.
    ///
    /// Returns `None` when the request does not exist.
    async fn find_withdraw(
        &self,
        id: WithdrawId,
    ) -> FinanceRepositoryResult<Option<WithdrawRequest>>;

    /// Returns a partner's withdrawal requests, oldest first.
    async fn list_withdraws_by_partner(
        &self,
        partner: &Principal,
    ) -> FinanceRepositoryResult<Vec<WithdrawRequest>>;
}

/// Errors returned by finance repository implementations.
#[derive(Debug, Clone, Error)]
pub enum FinanceRepositoryError {
    /// A settlement for the task has already been recorded.
    #[error("task already settled: {0}")]
    AlreadySettled(TaskId),

    /// A withdrawal with the same identifier already exists.
    #[error("duplicate withdrawal identifier: {0}")]
    DuplicateWithdraw(WithdrawId),

    /// The withdrawal request was not found.
    #[error("withdrawal not found: {0}")]
    WithdrawNotFound(WithdrawId),

    /// A balance rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] FinanceDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl FinanceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
