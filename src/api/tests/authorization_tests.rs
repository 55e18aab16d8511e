//! Unit tests for the engine's authorization gates.

use crate::api::{EngineError, InMemoryEngine};
use crate::ledger::domain::{JenisLayanan, LayananId};
use crate::registry::domain::{Principal, Role, UserStatus};
use crate::registry::services::ClientRegistrationRequest;
use crate::ledger::services::ActivateServiceRequest;
use rstest::{fixture, rstest};

fn principal(text: &str) -> Principal {
    Principal::new(text).expect("valid principal")
}

#[fixture]
fn engine() -> InMemoryEngine {
    InMemoryEngine::in_memory()
}

/// Claims the superadmin and returns its principal, giving tests an
/// admin-level caller to work with.
async fn bootstrap_superadmin(engine: &InMemoryEngine) -> Principal {
    let founder = principal("founder");
    engine
        .claim_superadmin(founder.clone(), "Founder")
        .await
        .expect("claim should succeed");
    founder
}

/// Registers and approves a user with the given role path.
async fn active_user(engine: &InMemoryEngine, admin: &Principal, text: &str, role: Role) -> Principal {
    let target = principal(text);
    match role {
        Role::Client => {
            engine
                .self_register_client(target.clone(), ClientRegistrationRequest::new(text))
                .await
                .expect("registration should succeed");
        }
        Role::Partner => {
            engine
                .self_register_partner(target.clone(), text, "Jakarta")
                .await
                .expect("registration should succeed");
        }
        _ => {
            engine
                .register_internal_staff(admin.clone(), target.clone(), text, role.as_str())
                .await
                .expect("staff registration should succeed");
            return target;
        }
    }
    engine
        .approve_user(admin.clone(), &target)
        .await
        .expect("approval should succeed");
    target
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_users_cannot_act(engine: InMemoryEngine) {
    let client = principal("client-1");
    engine
        .self_register_client(client.clone(), ClientRegistrationRequest::new("Client"))
        .await
        .expect("registration should succeed");

    let result = engine
        .create_task(client, LayananId::new(), "Draft", "detail")
        .await;

    assert!(matches!(result, Err(EngineError::Unauthorized { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approval_operations_require_admin_level(engine: InMemoryEngine) {
    let admin = bootstrap_superadmin(&engine).await;
    let client = active_user(&engine, &admin, "client-1", Role::Client).await;
    let target = principal("client-2");
    engine
        .self_register_client(target.clone(), ClientRegistrationRequest::new("Second"))
        .await
        .expect("registration should succeed");

    let result = engine.approve_user(client.clone(), &target).await;
    assert!(matches!(result, Err(EngineError::Unauthorized { .. })));

    let listing = engine.get_pending_requests(&client).await;
    assert!(matches!(listing, Err(EngineError::Unauthorized { .. })));

    engine
        .approve_user(admin, &target)
        .await
        .expect("admin approval should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn service_activation_is_limited_to_finance_and_admin(engine: InMemoryEngine) {
    let admin = bootstrap_superadmin(&engine).await;
    let client = active_user(&engine, &admin, "client-1", Role::Client).await;
    let finance = active_user(&engine, &admin, "finance-1", Role::Finance).await;

    let request = || {
        ActivateServiceRequest::new(
            principal("client-1"),
            principal("asistenmu-1"),
            JenisLayanan::Assistance,
            1,
            500_000,
        )
    };

    let denied = engine.activate_service(&client, request()).await;
    assert!(matches!(denied, Err(EngineError::Unauthorized { .. })));

    engine
        .activate_service(&finance, request())
        .await
        .expect("finance activation should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn withdraw_decisions_are_finance_only(engine: InMemoryEngine) {
    let admin = bootstrap_superadmin(&engine).await;
    let partner = active_user(&engine, &admin, "partner-1", Role::Partner).await;
    let finance = active_user(&engine, &admin, "finance-1", Role::Finance).await;
    engine
        .add_partner_balance(&admin, &partner, 100_000)
        .await
        .expect("credit should succeed");
    let request = engine
        .request_withdraw(partner.clone(), 50_000)
        .await
        .expect("request should succeed");

    // Even the superadmin may not decide withdrawals.
    let denied = engine.approve_withdraw(admin.clone(), request.id()).await;
    assert!(matches!(denied, Err(EngineError::Unauthorized { .. })));

    engine
        .approve_withdraw(finance, request.id())
        .await
        .expect("finance approval should succeed");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identity_queries_reflect_registry_state(engine: InMemoryEngine) {
    let admin = bootstrap_superadmin(&engine).await;
    let client = principal("client-1");
    engine
        .self_register_client(client.clone(), ClientRegistrationRequest::new("Client"))
        .await
        .expect("registration should succeed");

    assert!(!engine
        .is_caller_approved(&client)
        .await
        .expect("query should succeed"));
    assert!(engine
        .is_caller_admin(&admin)
        .await
        .expect("query should succeed"));
    assert!(!engine
        .is_caller_admin(&client)
        .await
        .expect("query should succeed"));
    assert_eq!(
        engine
            .get_caller_user_role(&client)
            .await
            .expect("query should succeed"),
        Some(Role::Client)
    );
    assert!(engine
        .get_current_user(&principal("ghost"))
        .await
        .expect("query should succeed")
        .is_none());

    engine
        .approve_user(admin, &client)
        .await
        .expect("approval should succeed");
    assert!(engine
        .is_caller_approved(&client)
        .await
        .expect("query should succeed"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_reads_are_self_or_admin(engine: InMemoryEngine) {
    let admin = bootstrap_superadmin(&engine).await;
    let client = active_user(&engine, &admin, "client-1", Role::Client).await;
    let other = active_user(&engine, &admin, "client-2", Role::Client).await;

    let own = engine
        .get_user_profile(&client, &client)
        .await
        .expect("own read should succeed");
    assert_eq!(own.map(|user| user.status()), Some(UserStatus::Active));

    let denied = engine.get_user_profile(&client, &other).await;
    assert!(matches!(denied, Err(EngineError::Unauthorized { .. })));

    let admin_read = engine
        .get_user_profile(&admin, &other)
        .await
        .expect("admin read should succeed");
    assert!(admin_read.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_listing_masks_delegation_for_the_client(engine: InMemoryEngine) {
    let admin = bootstrap_superadmin(&engine).await;
    let client = active_user(&engine, &admin, "client-1", Role::Client).await;
    let asistenmu = active_user(&engine, &admin, "asistenmu-1", Role::Asistenmu).await;
    let finance = active_user(&engine, &admin, "finance-1", Role::Finance).await;
    let partner = active_user(&engine, &admin, "partner-1", Role::Partner).await;

    let layanan = engine
        .activate_service(
            &finance,
            ActivateServiceRequest::new(
                client.clone(),
                asistenmu.clone(),
                JenisLayanan::Assistance,
                2,
                500_000,
            ),
        )
        .await
        .expect("activation should succeed");
    let task = engine
        .create_task(client.clone(), layanan.id(), "Draft", "detail")
        .await
        .expect("task creation should succeed");
    engine
        .input_estimasi_am(&asistenmu, task.id(), 2)
        .await
        .expect("estimate should succeed");
    engine
        .assign_partner(
            &asistenmu,
            task.id(),
            crate::task::services::AssignPartnerRequest::new(
                partner,
                "scope",
                chrono::Utc::now(),
                "https://drive.example/internal",
                2,
                "senior",
            ),
        )
        .await
        .expect("assignment should succeed");
    engine
        .approve_estimasi_client(&client, task.id())
        .await
        .expect("estimate approval should succeed");

    let views = engine
        .get_client_tasks(&client, &client)
        .await
        .expect("listing should succeed");
    assert_eq!(
        views.first().map(|view| view.status.as_str()),
        Some("Sedang Didelegasikan")
    );

    // A stranger cannot read the client's tasks.
    let stranger = active_user(&engine, &admin, "client-2", Role::Client).await;
    let denied = engine.get_client_tasks(&stranger, &client).await;
    assert!(matches!(denied, Err(EngineError::Unauthorized { .. })));
}
