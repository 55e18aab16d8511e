//! Fee schedule configuration and the settlement split computation.

use super::error::FinanceDomainError;
use serde::{Deserialize, Serialize};

/// Basis points in a whole (100%).
const BPS_SCALE: u32 = 10_000;

/// Fee split applied to a task's settlement value, in basis points.
///
/// The three shares must sum to exactly [`BPS_SCALE`]. Rounding remainders
/// from the partner and referral shares accrue to the platform share so the
/// split always sums to the settled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    platform_bps: u32,
    partner_bps: u32,
    referral_bps: u32,
}

impl FeeSchedule {
    /// Creates a validated fee schedule.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::InvalidFeeSchedule`] when the shares do
    /// not sum to exactly 10 000 basis points.
    pub const fn new(
        platform_bps: u32,
        partner_bps: u32,
        referral_bps: u32,
    ) -> Result<Self, FinanceDomainError> {
        let total = platform_bps + partner_bps + referral_bps;
        if total != BPS_SCALE {
            return Err(FinanceDomainError::InvalidFeeSchedule(total));
        }
        Ok(Self {
            platform_bps,
            partner_bps,
            referral_bps,
        })
    }

    /// Returns the platform share in basis points.
    #[must_use]
    pub const fn platform_bps(&self) -> u32 {
        self.platform_bps
    }

    /// Returns the partner share in basis points.
    #[must_use]
    pub const fn partner_bps(&self) -> u32 {
        self.partner_bps
    }

    /// Returns the referral share in basis points.
    #[must_use]
    pub const fn referral_bps(&self) -> u32 {
        self.referral_bps
    }

    /// Splits a settlement value across the three shares.
    ///
    /// # Errors
    ///
    /// Returns [`FinanceDomainError::AmountOverflow`] when a share does not
    /// fit the monetary range after scaling.
    pub fn split(&self, nilai: u64) -> Result<FeeBreakdown, FinanceDomainError> {
        let partner_fee = share_of(nilai, self.partner_bps)?;
        let referral_fee = share_of(nilai, self.referral_bps)?;
        let platform_fee = nilai
            .checked_sub(partner_fee)
            .and_then(|rest| rest.checked_sub(referral_fee))
            .ok_or(FinanceDomainError::AmountOverflow)?;

        Ok(FeeBreakdown {
            platform_fee,
            partner_fee,
            partner_referral_fee: referral_fee,
        })
    }
}

impl Default for FeeSchedule {
    /// Default platform split: 20% platform, 70% partner, 10% referral.
    fn default() -> Self {
        Self {
            platform_bps: 2_000,
            partner_bps: 7_000,
            referral_bps: 1_000,
        }
    }
}

/// Computed fee shares of a settlement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Share retained by the platform, including rounding remainders.
    pub platform_fee: u64,
    /// Share payable to the executing partner.
    pub partner_fee: u64,
    /// Share payable to the partner's referrer.
    pub partner_referral_fee: u64,
}

fn share_of(nilai: u64, bps: u32) -> Result<u64, FinanceDomainError> {
    let scaled = u128::from(nilai) * u128::from(bps) / u128::from(BPS_SCALE);
    u64::try_from(scaled).map_err(|_| FinanceDomainError::AmountOverflow)
}
