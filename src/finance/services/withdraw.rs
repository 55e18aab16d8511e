//! Service layer for partner withdrawals and balance adjustments.

use crate::finance::{
    domain::{FinanceDomainError, WithdrawId, WithdrawRequest},
    ports::{FinanceRepository, FinanceRepositoryError},
};
use crate::registry::domain::Principal;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for withdrawal operations.
#[derive(Debug, Error)]
pub enum WithdrawError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] FinanceDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] FinanceRepositoryError),
    /// The withdrawal request is not registered.
    #[error("withdrawal not found: {0}")]
    WithdrawNotFound(WithdrawId),
}

/// Result type for withdrawal service operations.
pub type WithdrawResult<T> = Result<T, WithdrawError>;

/// Withdrawal orchestration service.
#[derive(Clone)]
pub struct WithdrawService<R, C>
where
    R: FinanceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> WithdrawService<R, C>
where
    R: FinanceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new withdrawal service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Files a withdrawal request for a partner.
    ///
    /// The amount is validated against the partner's current available
    /// balance; pending requests do not reserve funds — the approval-time
    /// debit is the authoritative check.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::ZeroAmount`] for a zero amount and
    /// [`FinanceDomainError::InsufficientFunds`] when the amount exceeds
    /// the current balance.
    pub async fn request_withdraw(
        &self,
        partner: Principal,
        amount: u64,
    ) -> WithdrawResult<WithdrawRequest> {
        let available = self.repository.partner_balance(&partner).await?;
        if amount > available {
            return Err(FinanceDomainError::InsufficientFunds {
                partner,
                requested: amount,
                available,
            }
            .into());
        }
        let request = WithdrawRequest::new(partner, amount, self.clock.utc())?;
        self.repository.store_withdraw(&request).await?;
        info!(
            withdraw_id = %request.id(),
            partner = %request.partner(),
            amount = request.amount(),
            "withdrawal requested"
        );
        Ok(request)
    }

    /// Approves a pending withdrawal and debits the partner balance.
    ///
    /// The debit is re-checked atomically at approval time, so an approval
    /// can still fail with `InsufficientFunds` if the balance moved since
    /// the request was filed.
    ///
    /// # Errors
    ///
    /// Returns [`WithdrawError::WithdrawNotFound`] for unknown requests,
    /// [`FinanceDomainError::AlreadyResolved`] for non-pending requests and
    /// [`FinanceDomainError::InsufficientFunds`] when the balance cannot
    /// cover the amount.
    pub async fn approve_withdraw(
        &self,
        finance: Principal,
        id: WithdrawId,
    ) -> WithdrawResult<WithdrawRequest> {
        let mut request = self.load(id).await?;
        request.approve(finance, self.clock.utc())?;
        // Debit before persisting the resolution: a failed debit leaves the
        // stored request pending.
        self.repository
            .debit_partner(request.partner(), request.amount())
            .await?;
        self.repository.update_withdraw(&request).await?;
        info!(
            withdraw_id = %request.id(),
            partner = %request.partner(),
            amount = request.amount(),
            "withdrawal approved and debited"
        );
        Ok(request)
    }

    /// Rejects a pending withdrawal without debit.
    ///
    /// # Errors
    ///
    /// Returns [`WithdrawError::WithdrawNotFound`] for unknown requests and
    /// [`FinanceDomainError::AlreadyResolved`] for non-pending requests.
    pub async fn reject_withdraw(
        &self,
        finance: Principal,
        id: WithdrawId,
    ) -> WithdrawResult<WithdrawRequest> {
        let mut request = self.load(id).await?;
        request.reject(finance, self.clock.utc())?;
        self.repository.update_withdraw(&request).await?;
        warn!(withdraw_id = %request.id(), "withdrawal rejected");
        Ok(request)
    }

    /// Manually credits a partner balance (administrative correction path).
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::ZeroAmount`] for a zero amount and
    /// [`FinanceDomainError::AmountOverflow`] when the credit exceeds the
    /// monetary range.
    pub async fn add_partner_balance(
        &self,
        partner: &Principal,
        amount: u64,
    ) -> WithdrawResult<u64> {
        if amount == 0 {
            return Err(FinanceDomainError::ZeroAmount.into());
        }
        let balance = self.repository.credit_partner(partner, amount).await?;
        info!(partner = %partner, amount, balance, "partner balance credited");
        Ok(balance)
    }

    /// Returns a partner's current balance.
    ///
    /// # Errors
    ///
    /// Returns [`WithdrawError::Repository`] when the lookup fails.
    pub async fn get_partner_balance(&self, partner: &Principal) -> WithdrawResult<u64> {
        Ok(self.repository.partner_balance(partner).await?)
    }

    /// Returns a partner's withdrawal requests, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`WithdrawError::Repository`] when the listing fails.
    pub async fn list_withdraws(
        &self,
        partner: &Principal,
    ) -> WithdrawResult<Vec<WithdrawRequest>> {
        Ok(self.repository.list_withdraws_by_partner(partner).await?)
    }

    async fn load(&self, id: WithdrawId) -> WithdrawResult<WithdrawRequest> {
        self.repository
            .find_withdraw(id)
            .await?
            .ok_or(WithdrawError::WithdrawNotFound(id))
    }
}
