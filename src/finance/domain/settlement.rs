//! Financial settlement record produced at task completion.

use super::error::FinanceDomainError;
use super::fees::FeeSchedule;
use crate::task::domain::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable settlement record, produced exactly once per completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialResult {
    task_id: TaskId,
    task_status: TaskStatus,
    jam_dibakar: u64,
    nilai_tugas: u64,
    platform_fee: u64,
    partner_fee: u64,
    partner_referral_fee: u64,
    jumlah_bayar: u64,
    settled_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted settlement record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFinancialResult {
    /// Persisted task identifier.
    pub task_id: TaskId,
    /// Persisted task status at settlement.
    pub task_status: TaskStatus,
    /// Persisted burned hours.
    pub jam_dibakar: u64,
    /// Persisted settlement value.
    pub nilai_tugas: u64,
    /// Persisted platform fee.
    pub platform_fee: u64,
    /// Persisted partner fee.
    pub partner_fee: u64,
    /// Persisted referral fee.
    pub partner_referral_fee: u64,
    /// Persisted payable amount.
    pub jumlah_bayar: u64,
    /// Persisted settlement timestamp.
    pub settled_at: DateTime<Utc>,
}

impl FinancialResult {
    /// Computes the settlement for a completed task.
    ///
    /// The settlement value is `jam_dibakar × tarif_per_jam`; the payable
    /// amount credited to the partner is the partner fee share.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::AmountOverflow`] when the settlement
    /// value or a fee share exceeds the monetary range.
    pub fn settle(
        task_id: TaskId,
        task_status: TaskStatus,
        jam_dibakar: u64,
        tarif_per_jam: u64,
        schedule: &FeeSchedule,
        at: DateTime<Utc>,
    ) -> Result<Self, FinanceDomainError> {
        let nilai_tugas = jam_dibakar
            .checked_mul(tarif_per_jam)
            .ok_or(FinanceDomainError::AmountOverflow)?;
        let fees = schedule.split(nilai_tugas)?;

        Ok(Self {
            task_id,
            task_status,
            jam_dibakar,
            nilai_tugas,
            platform_fee: fees.platform_fee,
            partner_fee: fees.partner_fee,
            partner_referral_fee: fees.partner_referral_fee,
            jumlah_bayar: fees.partner_fee,
            settled_at: at,
        })
    }

    /// Reconstructs a settlement record from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedFinancialResult) -> Self {
        Self {
            task_id: data.task_id,
            task_status: data.task_status,
            jam_dibakar: data.jam_dibakar,
            nilai_tugas: data.nilai_tugas,
            platform_fee: data.platform_fee,
            partner_fee: data.partner_fee,
            partner_referral_fee: data.partner_referral_fee,
            jumlah_bayar: data.jumlah_bayar,
            settled_at: data.settled_at,
        }
    }

    /// Returns the settled task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the task status recorded at settlement.
    #[must_use]
    pub const fn task_status(&self) -> TaskStatus {
        self.task_status
    }

    /// Returns the hours burned from the service balance.
    #[must_use]
    pub const fn jam_dibakar(&self) -> u64 {
        self.jam_dibakar
    }

    /// Returns the settlement value.
    #[must_use]
    pub const fn nilai_tugas(&self) -> u64 {
        self.nilai_tugas
    }

    /// Returns the platform fee share.
    #[must_use]
    pub const fn platform_fee(&self) -> u64 {
        self.platform_fee
    }

    /// Returns the partner fee share.
    #[must_use]
    pub const fn partner_fee(&self) -> u64 {
        self.partner_fee
    }

    /// Returns the referral fee share.
    #[must_use]
    pub const fn partner_referral_fee(&self) -> u64 {
        self.partner_referral_fee
    }

    /// Returns the amount payable to the partner.
    #[must_use]
    pub const fn jumlah_bayar(&self) -> u64 {
        self.jumlah_bayar
    }

    /// Returns the settlement timestamp.
    #[must_use]
    pub const fn settled_at(&self) -> DateTime<Utc> {
        self.settled_at
    }
}
