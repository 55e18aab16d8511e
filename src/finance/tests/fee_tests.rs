//! Unit tests for the fee schedule and settlement computation.

use crate::finance::domain::{FeeSchedule, FinanceDomainError, FinancialResult};
use crate::task::domain::{TaskId, TaskStatus};
use chrono::Utc;
use eyre::ensure;
use rstest::rstest;

#[test]
fn default_schedule_is_twenty_seventy_ten() {
    let schedule = FeeSchedule::default();
    assert_eq!(schedule.platform_bps(), 2_000);
    assert_eq!(schedule.partner_bps(), 7_000);
    assert_eq!(schedule.referral_bps(), 1_000);
}

#[test]
fn schedule_rejects_shares_not_summing_to_whole() {
    assert_eq!(
        FeeSchedule::new(2_000, 7_000, 500).map(|schedule| schedule.platform_bps()),
        Err(FinanceDomainError::InvalidFeeSchedule(9_500))
    );
}

#[rstest]
#[case(1_000_000, 200_000, 700_000, 100_000)]
#[case(0, 0, 0, 0)]
// Odd values: rounding remainders accrue to the platform share.
#[case(999, 201, 699, 99)]
#[case(1, 1, 0, 0)]
fn split_sums_to_the_settled_value(
    #[case] nilai: u64,
    #[case] platform: u64,
    #[case] partner: u64,
    #[case] referral: u64,
) -> eyre::Result<()> {
    let fees = FeeSchedule::default().split(nilai)?;

    ensure!(fees.platform_fee == platform);
    ensure!(fees.partner_fee == partner);
    ensure!(fees.partner_referral_fee == referral);
    ensure!(fees.platform_fee + fees.partner_fee + fees.partner_referral_fee == nilai);
    Ok(())
}

#[test]
fn settlement_derives_value_from_burned_hours() -> eyre::Result<()> {
    let result = FinancialResult::settle(
        TaskId::new(),
        TaskStatus::Completed,
        4,
        250_000,
        &FeeSchedule::default(),
        Utc::now(),
    )?;

    ensure!(result.nilai_tugas() == 1_000_000);
    ensure!(result.jam_dibakar() == 4);
    ensure!(result.platform_fee() == 200_000);
    ensure!(result.partner_fee() == 700_000);
    ensure!(result.partner_referral_fee() == 100_000);
    ensure!(result.jumlah_bayar() == result.partner_fee());
    Ok(())
}

#[test]
fn settlement_rejects_value_overflow() {
    let result = FinancialResult::settle(
        TaskId::new(),
        TaskStatus::Completed,
        u64::MAX,
        2,
        &FeeSchedule::default(),
        Utc::now(),
    );

    assert!(matches!(result, Err(FinanceDomainError::AmountOverflow)));
}
