//! Concurrency tests for the layanan balance: the only contended-write
//! resource in the system.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use chrono::Utc;
use delegasi::api::InMemoryEngine;
use delegasi::ledger::adapters::memory::InMemoryLayananRepository;
use delegasi::ledger::domain::{JenisLayanan, Layanan, LayananActivation, ResourceType};
use delegasi::ledger::ports::LayananRepository;
use delegasi::ledger::services::ActivateServiceRequest;
use delegasi::registry::domain::Principal;
use delegasi::registry::services::ClientRegistrationRequest;

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_reservations_cannot_both_take_the_last_hours() {
    let repository = Arc::new(InMemoryLayananRepository::new());
    let record = Layanan::activate(
        LayananActivation {
            client: principal("client-1"),
            asistenmu: principal("asistenmu-1"),
            jenis: JenisLayanan::Assistance,
            resource_type: ResourceType::Standard,
            units: 1,
            harga_per_unit: 500_000,
            deadline: None,
            scope: None,
        },
        Utc::now(),
    )
    .expect("valid activation");
    repository.store(&record).await.expect("store");

    // Two hours available; two concurrent 2-hour reservations race.
    let first = {
        let repository = Arc::clone(&repository);
        let id = record.id();
        tokio::spawn(async move { repository.reserve_hours(id, 2, Utc::now()).await })
    };
    let second = {
        let repository = Arc::clone(&repository);
        let id = record.id();
        tokio::spawn(async move { repository.reserve_hours(id, 2, Utc::now()).await })
    };

    let outcomes = [
        first.await.expect("join"),
        second.await.expect("join"),
    ];
    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(successes, 1, "exactly one reservation may win");

    let updated = repository
        .find_by_id(record.id())
        .await
        .expect("lookup")
        .expect("layanan exists");
    assert_eq!(updated.jam_on_hold(), 2);
    assert_eq!(updated.jam_tersedia(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_task_creation_admits_exactly_one_task() {
    let engine = Arc::new(InMemoryEngine::in_memory());

    let superadmin = principal("founder");
    engine
        .claim_superadmin(superadmin.clone(), "Founder")
        .await
        .expect("claim");
    let client = principal("client-1");
    engine
        .self_register_client(client.clone(), ClientRegistrationRequest::new("Client"))
        .await
        .expect("registration");
    engine
        .approve_user(superadmin.clone(), &client)
        .await
        .expect("approval");

    // One unit: exactly one 2-hour reservation fits.
    let layanan = engine
        .activate_service(
            &superadmin,
            ActivateServiceRequest::new(
                client.clone(),
                principal("asistenmu-1"),
                JenisLayanan::Assistance,
                1,
                500_000,
            ),
        )
        .await
        .expect("activation");

    let tasks: Vec<_> = (0..2)
        .map(|index| {
            let engine = Arc::clone(&engine);
            let client = client.clone();
            let layanan_id = layanan.id();
            tokio::spawn(async move {
                engine
                    .create_task(
                        client,
                        layanan_id,
                        format!("Task {index}"),
                        "racing request",
                    )
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for task in tasks {
        if task.await.expect("join").is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1, "only one concurrent creation may succeed");

    let views = engine
        .get_client_tasks(&client, &client)
        .await
        .expect("listing");
    assert_eq!(views.len(), 1);
}
