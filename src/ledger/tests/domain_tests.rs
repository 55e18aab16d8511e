//! Unit tests for layanan balance accounting.

use crate::ledger::domain::{
    HOURS_PER_UNIT, JenisLayanan, Layanan, LayananActivation, LayananStatus, LedgerDomainError,
    ResourceType,
};
use crate::registry::domain::Principal;
use chrono::Utc;
use eyre::{bail, ensure};
use rstest::rstest;

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

fn activation(units: u64, harga_per_unit: u64) -> LayananActivation {
    LayananActivation {
        client: principal("client-1"),
        asistenmu: principal("asistenmu-1"),
        jenis: JenisLayanan::Assistance,
        resource_type: ResourceType::Standard,
        units,
        harga_per_unit,
        deadline: None,
        scope: None,
    }
}

fn active_layanan(units: u64) -> Layanan {
    Layanan::activate(activation(units, 500_000), Utc::now()).expect("valid activation")
}

#[test]
fn activation_grants_two_hours_per_unit() {
    let record = active_layanan(5);

    assert_eq!(record.status(), LayananStatus::Active);
    assert_eq!(record.saldo_original(), 5 * HOURS_PER_UNIT);
    assert_eq!(record.saldo_jam_efektif(), 10);
    assert_eq!(record.jam_on_hold(), 0);
    assert_eq!(record.tarif_per_jam(), 250_000);
}

#[test]
fn activation_rejects_zero_units() {
    assert_eq!(
        Layanan::activate(activation(0, 500_000), Utc::now()).map(|record| record.id()),
        Err(LedgerDomainError::InvalidUnitCount(0))
    );
}

#[test]
fn activation_rejects_zero_price() {
    assert_eq!(
        Layanan::activate(activation(3, 0), Utc::now()).map(|record| record.id()),
        Err(LedgerDomainError::InvalidPrice)
    );
}

#[test]
fn reserve_moves_hours_onto_hold() -> eyre::Result<()> {
    let mut record = active_layanan(1);

    record.reserve(HOURS_PER_UNIT, Utc::now())?;

    ensure!(record.saldo_jam_efektif() == 2);
    ensure!(record.jam_on_hold() == 2);
    ensure!(record.jam_tersedia() == 0);
    Ok(())
}

#[test]
fn reserve_rejects_more_than_available() -> eyre::Result<()> {
    let mut record = active_layanan(1);
    record.reserve(1, Utc::now())?;

    let result = record.reserve(2, Utc::now());
    let expected = Err(LedgerDomainError::InsufficientBalance {
        layanan_id: record.id(),
        requested: 2,
        available: 1,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(record.jam_on_hold() == 1);
    Ok(())
}

#[rstest]
#[case(LayananStatus::Dormant)]
#[case(LayananStatus::Depleted)]
fn reserve_requires_active_status(#[case] status: LayananStatus) -> eyre::Result<()> {
    let mut record = active_layanan(1);
    match status {
        LayananStatus::Dormant => record.mark_dormant(Utc::now())?,
        LayananStatus::Depleted => {
            record.reserve(2, Utc::now())?;
            record.burn(2, Utc::now())?;
        }
        LayananStatus::Active | LayananStatus::PendingApproval => {
            bail!("case must be a non-active status")
        }
    }

    let result = record.reserve(1, Utc::now());
    let expected = Err(LedgerDomainError::NotActive {
        layanan_id: record.id(),
        status,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[test]
fn release_returns_hours_to_available_pool() -> eyre::Result<()> {
    let mut record = active_layanan(2);
    record.reserve(3, Utc::now())?;

    record.release(2, Utc::now())?;

    ensure!(record.saldo_jam_efektif() == 4);
    ensure!(record.jam_on_hold() == 1);
    ensure!(record.jam_tersedia() == 3);
    Ok(())
}

#[test]
fn release_rejects_more_than_held() -> eyre::Result<()> {
    let mut record = active_layanan(2);
    record.reserve(1, Utc::now())?;

    let result = record.release(2, Utc::now());
    let expected = Err(LedgerDomainError::HoldExceeded {
        layanan_id: record.id(),
        requested: 2,
        held: 1,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[test]
fn burn_consumes_balance_and_hold() -> eyre::Result<()> {
    let mut record = active_layanan(3);
    record.reserve(4, Utc::now())?;

    record.burn(3, Utc::now())?;

    ensure!(record.saldo_jam_efektif() == 3);
    ensure!(record.jam_on_hold() == 1);
    ensure!(record.status() == LayananStatus::Active);
    Ok(())
}

#[test]
fn burn_requires_held_hours() -> eyre::Result<()> {
    let mut record = active_layanan(3);

    let result = record.burn(1, Utc::now());
    let expected = Err(LedgerDomainError::HoldExceeded {
        layanan_id: record.id(),
        requested: 1,
        held: 0,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[test]
fn full_burn_depletes_the_layanan() -> eyre::Result<()> {
    let mut record = active_layanan(1);
    record.reserve(2, Utc::now())?;

    record.burn(2, Utc::now())?;

    ensure!(record.saldo_jam_efektif() == 0);
    ensure!(record.jam_on_hold() == 0);
    ensure!(record.status() == LayananStatus::Depleted);
    Ok(())
}

#[test]
fn invariant_holds_across_operation_sequences() -> eyre::Result<()> {
    let mut record = active_layanan(5);

    record.reserve(4, Utc::now())?;
    record.burn(2, Utc::now())?;
    record.reserve(3, Utc::now())?;
    record.release(1, Utc::now())?;
    record.burn(4, Utc::now())?;

    ensure!(record.jam_on_hold() <= record.saldo_jam_efektif());
    ensure!(record.saldo_jam_efektif() == 4);
    ensure!(record.jam_on_hold() == 0);
    Ok(())
}

#[test]
fn zero_hour_amounts_are_rejected() {
    let mut record = active_layanan(1);

    assert_eq!(
        record.reserve(0, Utc::now()),
        Err(LedgerDomainError::InvalidHours)
    );
    assert_eq!(
        record.release(0, Utc::now()),
        Err(LedgerDomainError::InvalidHours)
    );
    assert_eq!(
        record.burn(0, Utc::now()),
        Err(LedgerDomainError::InvalidHours)
    );
}
