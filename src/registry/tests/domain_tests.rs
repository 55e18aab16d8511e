//! Unit tests for registry domain types.

use crate::registry::domain::{
    ApprovalDecision, Principal, RegistryDomainError, Role, User, UserProfile, UserStatus,
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

#[rstest]
#[case("alice")]
#[case("w3gef-principal-2")]
#[case("  padded  ")]
fn principal_accepts_wellformed_text(#[case] text: &str) {
    let parsed = Principal::new(text).expect("principal should parse");
    assert_eq!(parsed.as_str(), text.trim());
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("has space")]
fn principal_rejects_malformed_text(#[case] text: &str) {
    assert_eq!(
        Principal::new(text),
        Err(RegistryDomainError::InvalidPrincipal(text.to_owned()))
    );
}

#[test]
fn principal_rejects_overlong_text() {
    let text = "p".repeat(64);
    assert!(Principal::new(text).is_err());
}

#[rstest]
#[case("admin", Role::Admin)]
#[case("finance", Role::Finance)]
#[case("concierge", Role::Concierge)]
#[case("asistenmu", Role::Asistenmu)]
#[case("strategicPartner", Role::StrategicPartner)]
fn parse_internal_accepts_registrable_roles(#[case] text: &str, #[case] expected: Role) {
    assert_eq!(Role::parse_internal(text), Ok(expected));
}

#[rstest]
#[case("superadmin")]
#[case("client")]
#[case("partner")]
#[case("janitor")]
fn parse_internal_rejects_non_internal_roles(#[case] text: &str) {
    assert_eq!(
        Role::parse_internal(text),
        Err(RegistryDomainError::NotInternalRole(text.to_owned()))
    );
}

#[rstest]
#[case(Role::Client, false, false)]
#[case(Role::Partner, false, false)]
#[case(Role::Admin, true, true)]
#[case(Role::Finance, true, false)]
#[case(Role::Concierge, true, false)]
#[case(Role::Asistenmu, true, false)]
#[case(Role::StrategicPartner, true, false)]
#[case(Role::Superadmin, true, true)]
fn role_classification(
    #[case] role: Role,
    #[case] internal: bool,
    #[case] admin_level: bool,
) {
    assert_eq!(role.is_internal(), internal);
    assert_eq!(role.is_admin_level(), admin_level);
}

#[test]
fn role_round_trips_through_storage_form() {
    for role in [
        Role::Client,
        Role::Partner,
        Role::Admin,
        Role::Finance,
        Role::Concierge,
        Role::Asistenmu,
        Role::StrategicPartner,
        Role::Superadmin,
    ] {
        assert_eq!(Role::try_from(role.as_str()), Ok(role));
    }
}

#[test]
fn profile_requires_nonempty_name() {
    assert_eq!(
        UserProfile::new("   ").map(|profile| profile.name().to_owned()),
        Err(RegistryDomainError::EmptyName)
    );
}

#[test]
fn profile_builder_sets_optional_fields() {
    let profile = UserProfile::new("PT Maju")
        .expect("valid profile")
        .with_company("PT Maju Bersama")
        .with_phone("0812000111")
        .with_email("halo@majubersama.id")
        .with_kota("Jakarta");

    assert_eq!(profile.name(), "PT Maju");
    assert_eq!(profile.company(), Some("PT Maju Bersama"));
    assert_eq!(profile.phone(), Some("0812000111"));
    assert_eq!(profile.email(), Some("halo@majubersama.id"));
    assert_eq!(profile.kota(), Some("Jakarta"));
}

#[test]
fn registration_starts_pending_without_decision() {
    let clock = DefaultClock;
    let user = User::register(
        principal("client-1"),
        UserProfile::new("Client One").expect("valid profile"),
        Role::Client,
        &clock,
    );

    assert_eq!(user.status(), UserStatus::Pending);
    assert!(user.decision().is_none());
    assert!(!user.is_active());
}

#[test]
fn approve_activates_and_stamps_decision() -> eyre::Result<()> {
    let clock = DefaultClock;
    let mut user = User::register(
        principal("client-1"),
        UserProfile::new("Client One")?,
        Role::Client,
        &clock,
    );

    user.approve(principal("admin-1"), &clock)?;

    ensure!(user.status() == UserStatus::Active);
    ensure!(user.is_active());
    match user.decision() {
        Some(ApprovalDecision::Approved { by, .. }) => {
            ensure!(by.as_str() == "admin-1");
        }
        other => bail!("expected approved decision, got {other:?}"),
    }
    Ok(())
}

#[test]
fn reject_is_terminal_and_records_reason() -> eyre::Result<()> {
    let clock = DefaultClock;
    let mut user = User::register(
        principal("partner-1"),
        UserProfile::new("Partner One")?,
        Role::Partner,
        &clock,
    );

    user.reject(
        principal("admin-1"),
        Some("incomplete profile".to_owned()),
        &clock,
    )?;

    ensure!(user.status() == UserStatus::Rejected);
    match user.decision() {
        Some(ApprovalDecision::Rejected { reason, .. }) => {
            ensure!(reason.as_deref() == Some("incomplete profile"));
        }
        other => bail!("expected rejected decision, got {other:?}"),
    }

    let result = user.approve(principal("admin-2"), &clock);
    let expected = Err(RegistryDomainError::InvalidStatusTransition {
        principal: principal("partner-1"),
        status: UserStatus::Rejected,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[rstest]
#[case(UserStatus::Active)]
#[case(UserStatus::Rejected)]
fn decisions_require_pending_status(#[case] settled: UserStatus) -> eyre::Result<()> {
    let clock = DefaultClock;
    let mut user = User::register(
        principal("client-2"),
        UserProfile::new("Client Two")?,
        Role::Client,
        &clock,
    );
    match settled {
        UserStatus::Active => user.approve(principal("admin-1"), &clock)?,
        UserStatus::Rejected => user.reject(principal("admin-1"), None, &clock)?,
        UserStatus::Pending => bail!("case must be a settled status"),
    }

    let result = user.reject(principal("admin-1"), None, &clock);
    let expected = Err(RegistryDomainError::InvalidStatusTransition {
        principal: principal("client-2"),
        status: settled,
    });
    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[test]
fn admin_registration_is_active_immediately() {
    let clock = DefaultClock;
    let user = User::register_approved(
        principal("staff-1"),
        UserProfile::new("Staff One").expect("valid profile"),
        Role::Asistenmu,
        principal("admin-1"),
        &clock,
    );

    assert_eq!(user.status(), UserStatus::Active);
    assert!(matches!(
        user.decision(),
        Some(ApprovalDecision::Approved { .. })
    ));
}
