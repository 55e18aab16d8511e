//! Service orchestration tests for registration paths.

use std::sync::Arc;

use crate::registry::{
    adapters::memory::InMemoryUserRepository,
    domain::{Principal, RegistryDomainError, Role, UserStatus},
    ports::UserRepositoryError,
    services::{ClientRegistrationRequest, RegistrationError, RegistrationService},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = RegistrationService<InMemoryUserRepository, DefaultClock>;

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

#[fixture]
fn service() -> TestService {
    RegistrationService::new(Arc::new(InMemoryUserRepository::new()), Arc::new(DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_registration_creates_pending_client(service: TestService) {
    let request = ClientRegistrationRequest::new("PT Maju")
        .with_company("PT Maju Bersama")
        .with_phone("0812000111")
        .with_email("halo@majubersama.id");

    let user = service
        .self_register_client(principal("client-1"), request)
        .await
        .expect("registration should succeed");

    assert_eq!(user.role(), Role::Client);
    assert_eq!(user.status(), UserStatus::Pending);
    assert_eq!(user.profile().company(), Some("PT Maju Bersama"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partner_registration_records_kota(service: TestService) {
    let user = service
        .self_register_partner(principal("partner-1"), "Budi", "Bandung")
        .await
        .expect("registration should succeed");

    assert_eq!(user.role(), Role::Partner);
    assert_eq!(user.profile().kota(), Some("Bandung"));
    assert_eq!(user.status(), UserStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn internal_registration_validates_requested_role(service: TestService) {
    let user = service
        .self_register_internal(principal("staff-1"), "Siti", "asistenmu")
        .await
        .expect("registration should succeed");
    assert_eq!(user.role(), Role::Asistenmu);
    assert_eq!(user.status(), UserStatus::Pending);

    let result = service
        .self_register_internal(principal("staff-2"), "Andi", "superadmin")
        .await;
    assert!(matches!(
        result,
        Err(RegistrationError::Domain(
            RegistryDomainError::NotInternalRole(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_principal_is_rejected(service: TestService) {
    service
        .self_register_client(principal("client-1"), ClientRegistrationRequest::new("First"))
        .await
        .expect("first registration should succeed");

    let result = service
        .self_register_partner(principal("client-1"), "Second", "Jakarta")
        .await;

    assert!(matches!(
        result,
        Err(RegistrationError::Repository(
            UserRepositoryError::DuplicatePrincipal(_)
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_registered_staff_is_active(service: TestService) {
    let user = service
        .register_internal_staff(
            principal("admin-1"),
            principal("staff-1"),
            "Siti",
            "finance",
        )
        .await
        .expect("registration should succeed");

    assert_eq!(user.role(), Role::Finance);
    assert_eq!(user.status(), UserStatus::Active);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_name_fails_validation(service: TestService) {
    let result = service
        .self_register_partner(principal("partner-1"), "   ", "Bandung")
        .await;

    assert!(matches!(
        result,
        Err(RegistrationError::Domain(RegistryDomainError::EmptyName))
    ));
}
