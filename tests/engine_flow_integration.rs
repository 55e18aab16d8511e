//! Behavioural integration tests for the in-memory engine.
//!
//! These tests exercise the full delegation flow end to end: superadmin
//! claim, registration and approval, service activation, the task
//! lifecycle through completion settlement, and the partner withdrawal
//! path.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]
#![expect(
    clippy::cognitive_complexity,
    reason = "Test functions may have higher complexity for full scenario coverage"
)]

use chrono::{Duration, Utc};
use delegasi::api::InMemoryEngine;
use delegasi::ledger::domain::{JenisLayanan, LayananStatus};
use delegasi::ledger::services::ActivateServiceRequest;
use delegasi::registry::domain::{Principal, Role, UserStatus};
use delegasi::registry::services::ClientRegistrationRequest;
use delegasi::task::domain::TaskStatus;
use delegasi::task::services::AssignPartnerRequest;

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

struct Platform {
    engine: InMemoryEngine,
    superadmin: Principal,
    client: Principal,
    asistenmu: Principal,
    finance: Principal,
    partner: Principal,
}

/// Boots a platform with one active user per role.
async fn bootstrap() -> Platform {
    let engine = InMemoryEngine::in_memory();

    let superadmin = principal("founder");
    engine
        .claim_superadmin(superadmin.clone(), "Founder")
        .await
        .expect("superadmin claim");

    let client = principal("pt-maju");
    engine
        .self_register_client(
            client.clone(),
            ClientRegistrationRequest::new("PT Maju")
                .with_company("PT Maju Bersama")
                .with_email("halo@majubersama.id"),
        )
        .await
        .expect("client registration");
    engine
        .approve_user(superadmin.clone(), &client)
        .await
        .expect("client approval");

    let partner = principal("budi");
    engine
        .self_register_partner(partner.clone(), "Budi", "Bandung")
        .await
        .expect("partner registration");
    engine
        .approve_user(superadmin.clone(), &partner)
        .await
        .expect("partner approval");

    let asistenmu = principal("siti");
    engine
        .register_internal_staff(superadmin.clone(), asistenmu.clone(), "Siti", "asistenmu")
        .await
        .expect("asistenmu registration");

    let finance = principal("andi");
    engine
        .register_internal_staff(superadmin.clone(), finance.clone(), "Andi", "finance")
        .await
        .expect("finance registration");

    Platform {
        engine,
        superadmin,
        client,
        asistenmu,
        finance,
        partner,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_delegation_flow_settles_and_pays_the_partner() {
    let platform = bootstrap().await;
    let engine = &platform.engine;

    // Finance activates a 3-unit (6-hour) service at 500k per unit.
    let layanan = engine
        .activate_service(
            &platform.finance,
            ActivateServiceRequest::new(
                platform.client.clone(),
                platform.asistenmu.clone(),
                JenisLayanan::ReportWriting,
                3,
                500_000,
            )
            .with_scope("quarterly reporting"),
        )
        .await
        .expect("service activation");
    assert_eq!(layanan.saldo_jam_efektif(), 6);
    assert_eq!(layanan.tarif_per_jam(), 250_000);

    // The client raises a task; one unit of hours goes on hold.
    let task = engine
        .create_task(
            platform.client.clone(),
            layanan.id(),
            "Q3 report",
            "Draft the Q3 performance report",
        )
        .await
        .expect("task creation");
    assert_eq!(task.status(), TaskStatus::Requested);

    // Internal staff estimate four hours; the client approves, raising
    // the hold to match.
    engine
        .input_estimasi_am(&platform.asistenmu, task.id(), 4)
        .await
        .expect("estimate");
    engine
        .assign_partner(
            &platform.asistenmu,
            task.id(),
            AssignPartnerRequest::new(
                platform.partner.clone(),
                "draft and revise the report",
                Utc::now() + Duration::days(7),
                "https://drive.example/internal",
                4,
                "senior",
            ),
        )
        .await
        .expect("assignment");
    let approved = engine
        .approve_estimasi_client(&platform.client, task.id())
        .await
        .expect("estimate approval");
    assert_eq!(approved.status(), TaskStatus::PendingPartner);
    assert_eq!(approved.jam_reserved(), 4);

    // The partner accepts and works the task through QA and review.
    engine
        .respon_partner(&platform.partner, task.id(), true)
        .await
        .expect("acceptance");
    engine
        .update_task_status(&platform.asistenmu, task.id(), TaskStatus::InQA)
        .await
        .expect("qa transition");
    engine
        .update_task_status(&platform.asistenmu, task.id(), TaskStatus::ClientReview)
        .await
        .expect("review transition");

    // Completion burns the hours and settles 4h x 250k = 1M.
    let settlement = engine
        .complete_task(&platform.asistenmu, task.id())
        .await
        .expect("completion");
    assert_eq!(settlement.jam_dibakar(), 4);
    assert_eq!(settlement.nilai_tugas(), 1_000_000);
    assert_eq!(settlement.platform_fee(), 200_000);
    assert_eq!(settlement.partner_fee(), 700_000);
    assert_eq!(settlement.partner_referral_fee(), 100_000);
    assert_eq!(settlement.jumlah_bayar(), 700_000);

    // The ledger burned the hold; two hours remain available.
    let remaining = engine
        .get_client_main_service(&platform.client, &platform.client)
        .await
        .expect("main service lookup")
        .expect("layanan should remain active");
    assert_eq!(remaining.saldo_jam_efektif(), 2);
    assert_eq!(remaining.jam_on_hold(), 0);
    assert_eq!(remaining.status(), LayananStatus::Active);

    // The partner withdraws the accrued fee through finance.
    let balance = engine
        .get_partner_balance(&platform.partner, &platform.partner)
        .await
        .expect("balance lookup");
    assert_eq!(balance, 700_000);
    let withdraw = engine
        .request_withdraw(platform.partner.clone(), 700_000)
        .await
        .expect("withdraw request");
    engine
        .approve_withdraw(platform.finance.clone(), withdraw.id())
        .await
        .expect("withdraw approval");
    let drained = engine
        .get_partner_balance(&platform.partner, &platform.partner)
        .await
        .expect("balance lookup");
    assert_eq!(drained, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn repeat_completion_does_not_double_bill() {
    let platform = bootstrap().await;
    let engine = &platform.engine;

    let layanan = engine
        .activate_service(
            &platform.finance,
            ActivateServiceRequest::new(
                platform.client.clone(),
                platform.asistenmu.clone(),
                JenisLayanan::Assistance,
                1,
                500_000,
            ),
        )
        .await
        .expect("service activation");
    let task = engine
        .create_task(platform.client.clone(), layanan.id(), "Entry", "data entry batch")
        .await
        .expect("task creation");
    engine
        .input_estimasi_am(&platform.asistenmu, task.id(), 2)
        .await
        .expect("estimate");
    engine
        .assign_partner(
            &platform.asistenmu,
            task.id(),
            AssignPartnerRequest::new(
                platform.partner.clone(),
                "batch entry",
                Utc::now() + Duration::days(3),
                "https://drive.example/internal",
                2,
                "junior",
            ),
        )
        .await
        .expect("assignment");
    engine
        .approve_estimasi_client(&platform.client, task.id())
        .await
        .expect("estimate approval");
    engine
        .respon_partner(&platform.partner, task.id(), true)
        .await
        .expect("acceptance");
    engine
        .update_task_status(&platform.asistenmu, task.id(), TaskStatus::InQA)
        .await
        .expect("qa transition");
    engine
        .update_task_status(&platform.asistenmu, task.id(), TaskStatus::ClientReview)
        .await
        .expect("review transition");
    engine
        .complete_task(&platform.asistenmu, task.id())
        .await
        .expect("completion");

    // Fully burned single-unit service depletes.
    let depleted = engine
        .get_client_main_service(&platform.client, &platform.client)
        .await
        .expect("main service lookup");
    assert!(depleted.is_none(), "depleted layanan leaves active listings");

    let second = engine.complete_task(&platform.asistenmu, task.id()).await;
    assert!(second.is_err(), "second completion must fail");

    let balance = engine
        .get_partner_balance(&platform.partner, &platform.partner)
        .await
        .expect("balance lookup");
    assert_eq!(balance, 500_000 * 7 / 10, "partner fee credited exactly once");
}

#[tokio::test(flavor = "multi_thread")]
async fn partner_rejection_masks_churn_and_allows_reassignment() {
    let platform = bootstrap().await;
    let engine = &platform.engine;

    // A second partner for the reassignment.
    let partner_two = principal("wati");
    engine
        .self_register_partner(partner_two.clone(), "Wati", "Surabaya")
        .await
        .expect("partner registration");
    engine
        .approve_user(platform.superadmin.clone(), &partner_two)
        .await
        .expect("partner approval");

    let layanan = engine
        .activate_service(
            &platform.finance,
            ActivateServiceRequest::new(
                platform.client.clone(),
                platform.asistenmu.clone(),
                JenisLayanan::DataEntry,
                2,
                400_000,
            ),
        )
        .await
        .expect("service activation");
    let task = engine
        .create_task(platform.client.clone(), layanan.id(), "Entry", "data entry")
        .await
        .expect("task creation");
    engine
        .input_estimasi_am(&platform.asistenmu, task.id(), 2)
        .await
        .expect("estimate");
    engine
        .assign_partner(
            &platform.asistenmu,
            task.id(),
            AssignPartnerRequest::new(
                platform.partner.clone(),
                "batch one",
                Utc::now() + Duration::days(3),
                "https://drive.example/internal",
                2,
                "junior",
            ),
        )
        .await
        .expect("assignment");
    engine
        .approve_estimasi_client(&platform.client, task.id())
        .await
        .expect("estimate approval");

    // First partner declines; the hold stays and the client only sees
    // the delegation label.
    let rejected = engine
        .respon_partner(&platform.partner, task.id(), false)
        .await
        .expect("rejection");
    assert_eq!(rejected.status(), TaskStatus::RejectedByPartner);

    let views = engine
        .get_client_tasks(&platform.client, &platform.client)
        .await
        .expect("listing");
    assert_eq!(
        views.first().map(|view| view.status.as_str()),
        Some("Sedang Didelegasikan")
    );

    let held = engine
        .get_client_main_service(&platform.client, &platform.client)
        .await
        .expect("main service lookup")
        .expect("layanan active");
    assert_eq!(held.jam_on_hold(), 2, "rejection retains the hold");

    // Reassignment to the second partner proceeds to acceptance.
    engine
        .assign_partner(
            &platform.asistenmu,
            task.id(),
            AssignPartnerRequest::new(
                partner_two.clone(),
                "batch one",
                Utc::now() + Duration::days(3),
                "https://drive.example/internal",
                2,
                "junior",
            ),
        )
        .await
        .expect("reassignment");
    let accepted = engine
        .respon_partner(&partner_two, task.id(), true)
        .await
        .expect("acceptance");
    assert_eq!(accepted.status(), TaskStatus::OnProgress);
}

#[tokio::test(flavor = "multi_thread")]
async fn client_can_send_reviewed_work_back_to_revision() {
    let platform = bootstrap().await;
    let engine = &platform.engine;

    let layanan = engine
        .activate_service(
            &platform.finance,
            ActivateServiceRequest::new(
                platform.client.clone(),
                platform.asistenmu.clone(),
                JenisLayanan::ReportWriting,
                2,
                500_000,
            ),
        )
        .await
        .expect("service activation");
    let task = engine
        .create_task(platform.client.clone(), layanan.id(), "Report", "detail")
        .await
        .expect("task creation");
    engine
        .input_estimasi_am(&platform.asistenmu, task.id(), 2)
        .await
        .expect("estimate");
    engine
        .assign_partner(
            &platform.asistenmu,
            task.id(),
            AssignPartnerRequest::new(
                platform.partner.clone(),
                "scope",
                Utc::now() + Duration::days(3),
                "https://drive.example/internal",
                2,
                "senior",
            ),
        )
        .await
        .expect("assignment");
    engine
        .approve_estimasi_client(&platform.client, task.id())
        .await
        .expect("estimate approval");
    engine
        .respon_partner(&platform.partner, task.id(), true)
        .await
        .expect("acceptance");
    engine
        .update_task_status(&platform.asistenmu, task.id(), TaskStatus::InQA)
        .await
        .expect("qa transition");
    engine
        .update_task_status(&platform.asistenmu, task.id(), TaskStatus::ClientReview)
        .await
        .expect("review transition");

    // The owning client may request revision, but nothing else.
    let denied = engine
        .update_task_status(&platform.client, task.id(), TaskStatus::InQA)
        .await;
    assert!(denied.is_err());

    let revised = engine
        .update_task_status(&platform.client, task.id(), TaskStatus::Revision)
        .await
        .expect("client revision request");
    assert_eq!(revised.status(), TaskStatus::Revision);
}

#[tokio::test(flavor = "multi_thread")]
async fn superadmin_claim_is_single_use_and_rejection_is_terminal() {
    let engine = InMemoryEngine::in_memory();

    engine
        .claim_superadmin(principal("founder"), "Founder")
        .await
        .expect("first claim");
    let second = engine.claim_superadmin(principal("late"), "Late").await;
    assert!(second.is_err(), "claim is first-caller-wins");

    // Rejected users stay rejected and their principal stays bound.
    let applicant = principal("applicant");
    engine
        .self_register_client(applicant.clone(), ClientRegistrationRequest::new("Applicant"))
        .await
        .expect("registration");
    let rejected = engine
        .reject_user(
            principal("founder"),
            &applicant,
            Some("incomplete data".to_owned()),
        )
        .await
        .expect("rejection");
    assert_eq!(rejected.status(), UserStatus::Rejected);

    let again = engine
        .self_register_client(applicant.clone(), ClientRegistrationRequest::new("Applicant"))
        .await;
    assert!(again.is_err(), "rejected principals cannot re-register");

    let role = engine
        .get_caller_user_role(&applicant)
        .await
        .expect("role lookup");
    assert_eq!(role, Some(Role::Client));
}
