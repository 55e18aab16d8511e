//! Service orchestration tests for layanan activation and queries.

use std::sync::Arc;

use crate::ledger::{
    adapters::memory::InMemoryLayananRepository,
    domain::{JenisLayanan, LayananStatus, LedgerDomainError, ResourceType},
    ports::{LayananRepository, LayananRepositoryError},
    services::{ActivateServiceRequest, BalanceError, BalanceService},
};
use crate::registry::domain::Principal;
use chrono::Utc;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Harness {
    repository: Arc<InMemoryLayananRepository>,
    service: BalanceService<InMemoryLayananRepository, DefaultClock>,
}

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

fn request(client: &str, units: u64) -> ActivateServiceRequest {
    ActivateServiceRequest::new(
        principal(client),
        principal("asistenmu-1"),
        JenisLayanan::Assistance,
        units,
        500_000,
    )
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryLayananRepository::new());
    Harness {
        service: BalanceService::new(Arc::clone(&repository), Arc::new(DefaultClock)),
        repository,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn activation_persists_an_active_layanan(harness: Harness) {
    let record = harness
        .service
        .activate_service(
            request("client-1", 3)
                .with_resource_type(ResourceType::Dedicated)
                .with_scope("monthly reporting"),
        )
        .await
        .expect("activation should succeed");

    assert_eq!(record.status(), LayananStatus::Active);
    assert_eq!(record.saldo_jam_efektif(), 6);
    assert_eq!(record.resource_type(), ResourceType::Dedicated);
    assert_eq!(record.scope(), Some("monthly reporting"));

    let fetched = harness
        .service
        .find_by_id(record.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, Some(record));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_purchase_parameters_are_rejected(harness: Harness) {
    let result = harness.service.activate_service(request("client-1", 0)).await;

    assert!(matches!(
        result,
        Err(BalanceError::Domain(LedgerDomainError::InvalidUnitCount(0)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_listing_is_scoped_to_the_client(harness: Harness) {
    harness
        .service
        .activate_service(request("client-1", 1))
        .await
        .expect("activation should succeed");
    harness
        .service
        .activate_service(request("client-2", 2))
        .await
        .expect("activation should succeed");

    let records = harness
        .service
        .get_my_layanan_aktif(&principal("client-1"))
        .await
        .expect("listing should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records.first().map(|record| record.saldo_jam_efektif()), Some(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn main_service_is_the_oldest_active_layanan(harness: Harness) {
    let first = harness
        .service
        .activate_service(request("client-1", 1))
        .await
        .expect("activation should succeed");
    harness
        .service
        .activate_service(request("client-1", 2))
        .await
        .expect("activation should succeed");

    let main = harness
        .service
        .get_client_main_service(&principal("client-1"))
        .await
        .expect("lookup should succeed");

    assert_eq!(main.map(|record| record.id()), Some(first.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn main_service_is_none_without_active_layanan(harness: Harness) {
    let main = harness
        .service
        .get_client_main_service(&principal("client-1"))
        .await
        .expect("lookup should succeed");
    assert!(main.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dormant_layanan_leaves_active_listings(harness: Harness) {
    let record = harness
        .service
        .activate_service(request("client-1", 1))
        .await
        .expect("activation should succeed");

    harness
        .service
        .mark_dormant(record.id())
        .await
        .expect("dormant transition should succeed");

    let records = harness
        .service
        .get_my_layanan_aktif(&principal("client-1"))
        .await
        .expect("listing should succeed");
    assert!(records.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_reservation_is_atomic_check_then_update(harness: Harness) {
    let record = harness
        .service
        .activate_service(request("client-1", 1))
        .await
        .expect("activation should succeed");

    let reserved = harness
        .repository
        .reserve_hours(record.id(), 2, Utc::now())
        .await
        .expect("reservation should succeed");
    assert_eq!(reserved.jam_tersedia(), 0);

    let result = harness
        .repository
        .reserve_hours(record.id(), 1, Utc::now())
        .await;
    assert!(matches!(
        result,
        Err(LayananRepositoryError::Domain(
            LedgerDomainError::InsufficientBalance { .. }
        ))
    ));
}
