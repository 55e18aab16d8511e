//! Partner withdrawal request aggregate.

use super::error::{FinanceDomainError, ParseWithdrawStatusError};
use super::ids::WithdrawId;
use crate::registry::domain::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawStatus {
    /// Awaiting a finance decision.
    Pending,
    /// Approved and debited.
    Approved,
    /// Rejected without debit.
    Rejected,
}

impl WithdrawStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for WithdrawStatus {
    type Error = ParseWithdrawStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseWithdrawStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for WithdrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution stamp recorded when finance decides a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawResolution {
    /// Principal of the deciding finance staff.
    pub by: Principal,
    /// Decision timestamp.
    pub at: DateTime<Utc>,
}

/// Withdrawal request aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    id: WithdrawId,
    partner: Principal,
    amount: u64,
    status: WithdrawStatus,
    resolution: Option<WithdrawResolution>,
    requested_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWithdrawData {
    /// Persisted withdrawal identifier.
    pub id: WithdrawId,
    /// Persisted requesting partner.
    pub partner: Principal,
    /// Persisted amount.
    pub amount: u64,
    /// Persisted status.
    pub status: WithdrawStatus,
    /// Persisted resolution stamp, if resolved.
    pub resolution: Option<WithdrawResolution>,
    /// Persisted request timestamp.
    pub requested_at: DateTime<Utc>,
}

impl WithdrawRequest {
    /// Creates a pending withdrawal request.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::ZeroAmount`] when the amount is zero.
    pub fn new(
        partner: Principal,
        amount: u64,
        at: DateTime<Utc>,
    ) -> Result<Self, FinanceDomainError> {
        if amount == 0 {
            return Err(FinanceDomainError::ZeroAmount);
        }
        Ok(Self {
            id: WithdrawId::new(),
            partner,
            amount,
            status: WithdrawStatus::Pending,
            resolution: None,
            requested_at: at,
        })
    }

    /// Reconstructs a withdrawal request from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWithdrawData) -> Self {
        Self {
            id: data.id,
            partner: data.partner,
            amount: data.amount,
            status: data.status,
            resolution: data.resolution,
            requested_at: data.requested_at,
        }
    }

    /// Returns the withdrawal identifier.
    #[must_use]
    pub const fn id(&self) -> WithdrawId {
        self.id
    }

    /// Returns the requesting partner.
    #[must_use]
    pub const fn partner(&self) -> &Principal {
        &self.partner
    }

    /// Returns the requested amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns the request status.
    #[must_use]
    pub const fn status(&self) -> WithdrawStatus {
        self.status
    }

    /// Returns the resolution stamp, if resolved.
    #[must_use]
    pub const fn resolution(&self) -> Option<&WithdrawResolution> {
        self.resolution.as_ref()
    }

    /// Returns the request timestamp.
    #[must_use]
    pub const fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Approves a pending request.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::AlreadyResolved`] when the request is
    /// not pending.
    pub fn approve(&mut self, by: Principal, at: DateTime<Utc>) -> Result<(), FinanceDomainError> {
        self.require_pending()?;
        self.status = WithdrawStatus::Approved;
        self.resolution = Some(WithdrawResolution { by, at });
        Ok(())
    }

    /// Rejects a pending request without debit.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::AlreadyResolved`] when the request is
    /// not pending.
    pub fn reject(&mut self, by: Principal, at: DateTime<Utc>) -> Result<(), FinanceDomainError> {
        self.require_pending()?;
        self.status = WithdrawStatus::Rejected;
        self.resolution = Some(WithdrawResolution { by, at });
        Ok(())
    }

    fn require_pending(&self) -> Result<(), FinanceDomainError> {
        if self.status == WithdrawStatus::Pending {
            Ok(())
        } else {
            Err(FinanceDomainError::AlreadyResolved {
                withdraw_id: self.id,
                status: self.status,
            })
        }
    }
}
