//! In-memory repository for finance tests and single-process use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::finance::{
    domain::{FinanceDomainError, FinancialResult, WithdrawId, WithdrawRequest},
    ports::{FinanceRepository, FinanceRepositoryError, FinanceRepositoryResult},
};
use crate::registry::domain::Principal;
use crate::task::domain::TaskId;

/// Thread-safe in-memory finance repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFinanceRepository {
    state: Arc<RwLock<InMemoryFinanceState>>,
}

#[derive(Debug, Default)]
struct InMemoryFinanceState {
    settlements: HashMap<TaskId, FinancialResult>,
    balances: HashMap<Principal, u64>,
    withdraws: HashMap<WithdrawId, WithdrawRequest>,
}

impl InMemoryFinanceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> FinanceRepositoryError {
    FinanceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl FinanceRepository for InMemoryFinanceRepository {
    async fn record_settlement(&self, result: &FinancialResult) -> FinanceRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.settlements.contains_key(&result.task_id()) {
            return Err(FinanceRepositoryError::AlreadySettled(result.task_id()));
        }
        state.settlements.insert(result.task_id(), result.clone());
        Ok(())
    }

    async fn find_settlement(
        &self,
        task_id: TaskId,
    ) -> FinanceRepositoryResult<Option<FinancialResult>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.settlements.get(&task_id).cloned())
    }

    async fn credit_partner(
        &self,
        partner: &Principal,
        amount: u64,
    ) -> FinanceRepositoryResult<u64> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let balance = state.balances.entry(partner.clone()).or_insert(0);
        let updated = balance
            .checked_add(amount)
            .ok_or(FinanceDomainError::AmountOverflow)?;
        *balance = updated;
        Ok(updated)
    }

    async fn debit_partner(
        &self,
        partner: &Principal,
        amount: u64,
    ) -> FinanceRepositoryResult<u64> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let available = state.balances.get(partner).copied().unwrap_or(0);
        if amount > available {
            return Err(FinanceDomainError::InsufficientFunds {
                partner: partner.clone(),
                requested: amount,
                available,
            }
            .into());
        }
        let updated = available - amount;
        state.balances.insert(partner.clone(), updated);
        Ok(updated)
    }

    async fn partner_balance(&self, partner: &Principal) -> FinanceRepositoryResult<u64> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.balances.get(partner).copied().unwrap_or(0))
    }

    async fn store_withdraw(&self, request: &WithdrawRequest) -> FinanceRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.withdraws.contains_key(&request.id()) {
            return Err(FinanceRepositoryError::DuplicateWithdraw(request.id()));
        }
        state.withdraws.insert(request.id(), request.clone());
        Ok(())
    }

    async fn update_withdraw(&self, request: &WithdrawRequest) -> FinanceRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.withdraws.contains_key(&request.id()) {
            return Err(FinanceRepositoryError::WithdrawNotFound(request.id()));
        }
        state.withdraws.insert(request.id(), request.clone());
        Ok(())
    }

    async fn find_withdraw(
        &self,
        id: WithdrawId,
    ) -> FinanceRepositoryResult<Option<WithdrawRequest>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.withdraws.get(&id).cloned())
    }

    async fn list_withdraws_by_partner(
        &self,
        partner: &Principal,
    ) -> FinanceRepositoryResult<Vec<WithdrawRequest>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut requests: Vec<WithdrawRequest> = state
            .withdraws
            .values()
            .filter(|request| request.partner() == partner)
            .cloned()
            .collect();
        requests.sort_by_key(WithdrawRequest::requested_at);
        Ok(requests)
    }
}
