//! Role-gated engine facade exposing the remote-procedure surface.

use crate::api::error::{EngineError, EngineResult};
use crate::api::view::TaskClientView;
use crate::finance::{
    domain::{FeeSchedule, FinancialResult, WithdrawId, WithdrawRequest},
    ports::FinanceRepository,
    services::WithdrawService,
};
use crate::ledger::{
    domain::{Layanan, LayananId},
    ports::LayananRepository,
    services::{ActivateServiceRequest, BalanceService},
};
use crate::registry::{
    domain::{Principal, Role, User, UserStatus},
    ports::UserRepository,
    services::{
        ApprovalService, ClientRegistrationRequest, RegistrationService, UserApprovalInfo,
    },
};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::TaskRepository,
    services::{AssignPartnerRequest, TaskLifecycleService},
};
use mockable::Clock;
use std::sync::Arc;

/// Roles allowed to drive internal task operations (estimates, delegation,
/// status updates, completion).
const INTERNAL_STAFF: [Role; 3] = [Role::Asistenmu, Role::Admin, Role::Superadmin];

/// Roles allowed to activate layanan for clients.
const SERVICE_ACTIVATORS: [Role; 3] = [Role::Finance, Role::Admin, Role::Superadmin];

/// The engine facade.
///
/// Composes the module services over injected repositories and enforces
/// authorization from the user registry before delegating. Every method
/// takes the caller principal first; the registry is the sole source of
/// truth for "is the caller active and does it hold role X".
#[derive(Clone)]
pub struct Engine<U, L, T, F, C>
where
    U: UserRepository,
    L: LayananRepository,
    T: TaskRepository,
    F: FinanceRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    registration: RegistrationService<U, C>,
    approval: ApprovalService<U, C>,
    balance: BalanceService<L, C>,
    lifecycle: TaskLifecycleService<T, L, F, C>,
    withdraw: WithdrawService<F, C>,
}

impl<U, L, T, F, C> Engine<U, L, T, F, C>
where
    U: UserRepository,
    L: LayananRepository,
    T: TaskRepository,
    F: FinanceRepository,
    C: Clock + Send + Sync,
{
    /// Creates an engine over the injected repositories and clock.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        layanan: Arc<L>,
        tasks: Arc<T>,
        finance: Arc<F>,
        fees: FeeSchedule,
        clock: Arc<C>,
    ) -> Self {
        Self {
            registration: RegistrationService::new(Arc::clone(&users), Arc::clone(&clock)),
            approval: ApprovalService::new(Arc::clone(&users), Arc::clone(&clock)),
            balance: BalanceService::new(Arc::clone(&layanan), Arc::clone(&clock)),
            lifecycle: TaskLifecycleService::new(
                tasks,
                layanan,
                Arc::clone(&finance),
                fees,
                Arc::clone(&clock),
            ),
            withdraw: WithdrawService::new(finance, clock),
            users,
        }
    }

    // -----------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------

    /// Registers the caller as a pending client.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Registration`] when the profile is invalid
    /// or the principal is already registered.
    pub async fn self_register_client(
        &self,
        caller: Principal,
        request: ClientRegistrationRequest,
    ) -> EngineResult<User> {
        Ok(self.registration.self_register_client(caller, request).await?)
    }

    /// Registers the caller as a pending partner.
    ///
    /// # Errors
    ///
    /// As for [`Engine::self_register_client`].
    pub async fn self_register_partner(
        &self,
        caller: Principal,
        name: impl Into<String> + Send,
        kota: impl Into<String> + Send,
    ) -> EngineResult<User> {
        Ok(self.registration.self_register_partner(caller, name, kota).await?)
    }

    /// Registers the caller as pending internal staff with a requested
    /// sub-role.
    ///
    /// # Errors
    ///
    /// As for [`Engine::self_register_client`], plus the invalid-role
    /// rejection for text outside the registrable internal set.
    pub async fn self_register_internal(
        &self,
        caller: Principal,
        name: impl Into<String> + Send,
        requested_role: &str,
    ) -> EngineResult<User> {
        Ok(self
            .registration
            .self_register_internal(caller, name, requested_role)
            .await?)
    }

    /// Registers internal staff on behalf of an administrator; the new
    /// user is active immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active admin-level user.
    pub async fn register_internal_staff(
        &self,
        caller: Principal,
        principal: Principal,
        name: impl Into<String> + Send,
        requested_role: &str,
    ) -> EngineResult<User> {
        let registrar = self.require_admin_level(&caller, "register internal staff").await?;
        Ok(self
            .registration
            .register_internal_staff(
                registrar.principal().clone(),
                principal,
                name,
                requested_role,
            )
            .await?)
    }

    // -----------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------

    /// Returns the caller's own user record, if registered.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Approval`] when the lookup fails.
    pub async fn get_current_user(&self, caller: &Principal) -> EngineResult<Option<User>> {
        self.find_user(caller).await
    }

    /// Returns another user's record; restricted to the user itself and
    /// active admin-level callers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] for other callers.
    pub async fn get_user_profile(
        &self,
        caller: &Principal,
        principal: &Principal,
    ) -> EngineResult<Option<User>> {
        if caller != principal {
            self.require_admin_level(caller, "read another user's profile")
                .await?;
        }
        self.find_user(principal).await
    }

    /// Returns the caller's role, if registered.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Approval`] when the lookup fails.
    pub async fn get_caller_user_role(&self, caller: &Principal) -> EngineResult<Option<Role>> {
        Ok(self.find_user(caller).await?.map(|user| user.role()))
    }

    /// Returns true when the caller is registered and active.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Approval`] when the lookup fails.
    pub async fn is_caller_approved(&self, caller: &Principal) -> EngineResult<bool> {
        Ok(self
            .find_user(caller)
            .await?
            .is_some_and(|user| user.is_active()))
    }

    /// Returns true when the caller is an active admin-level user.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Approval`] when the lookup fails.
    pub async fn is_caller_admin(&self, caller: &Principal) -> EngineResult<bool> {
        Ok(self
            .find_user(caller)
            .await?
            .is_some_and(|user| user.is_active() && user.role().is_admin_level()))
    }

    // -----------------------------------------------------------------
    // Approval workflow
    // -----------------------------------------------------------------

    /// Approves a pending registration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active admin-level user, and the approval-workflow errors
    /// otherwise.
    pub async fn approve_user(
        &self,
        caller: Principal,
        principal: &Principal,
    ) -> EngineResult<User> {
        let approver = self.require_admin_level(&caller, "approve registrations").await?;
        Ok(self
            .approval
            .approve_user(approver.principal().clone(), principal)
            .await?)
    }

    /// Rejects a pending registration.
    ///
    /// # Errors
    ///
    /// As for [`Engine::approve_user`].
    pub async fn reject_user(
        &self,
        caller: Principal,
        principal: &Principal,
        reason: Option<String>,
    ) -> EngineResult<User> {
        let rejecter = self.require_admin_level(&caller, "reject registrations").await?;
        Ok(self
            .approval
            .reject_user(rejecter.principal().clone(), principal, reason)
            .await?)
    }

    /// Applies an approval decision carried as a status value.
    ///
    /// # Errors
    ///
    /// As for [`Engine::approve_user`].
    pub async fn set_approval(
        &self,
        caller: Principal,
        principal: &Principal,
        status: UserStatus,
    ) -> EngineResult<User> {
        let decider = self.require_admin_level(&caller, "set approval status").await?;
        Ok(self
            .approval
            .set_approval(decider.principal().clone(), principal, status)
            .await?)
    }

    /// Lists every registration with its approval status.
    ///
    /// # Errors
    ///
    /// As for [`Engine::approve_user`].
    pub async fn list_approvals(&self, caller: &Principal) -> EngineResult<Vec<UserApprovalInfo>> {
        self.require_admin_level(caller, "list approvals").await?;
        Ok(self.approval.list_approvals().await?)
    }

    /// Returns the registrations still awaiting a decision.
    ///
    /// # Errors
    ///
    /// As for [`Engine::approve_user`].
    pub async fn get_pending_requests(&self, caller: &Principal) -> EngineResult<Vec<User>> {
        self.require_admin_level(caller, "list pending registrations")
            .await?;
        Ok(self.approval.get_pending_requests().await?)
    }

    /// Replaces a user's role (superadmin excluded in both directions).
    ///
    /// # Errors
    ///
    /// As for [`Engine::approve_user`].
    pub async fn update_user_role(
        &self,
        caller: &Principal,
        principal: &Principal,
        new_role: Role,
    ) -> EngineResult<User> {
        self.require_admin_level(caller, "update user roles").await?;
        Ok(self.approval.update_user_role(principal, new_role).await?)
    }

    /// Claims the one-time system-wide superadmin role. First caller wins.
    ///
    /// # Errors
    ///
    /// Returns the repository claim error on every call after the first
    /// successful claim.
    pub async fn claim_superadmin(
        &self,
        caller: Principal,
        name: impl Into<String> + Send,
    ) -> EngineResult<User> {
        Ok(self.approval.claim_superadmin(caller, name).await?)
    }

    // -----------------------------------------------------------------
    // Service ledger
    // -----------------------------------------------------------------

    /// Activates a layanan for a client.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is active
    /// finance, admin or superadmin staff.
    pub async fn activate_service(
        &self,
        caller: &Principal,
        request: ActivateServiceRequest,
    ) -> EngineResult<Layanan> {
        self.require_role(caller, &SERVICE_ACTIVATORS, "activate services")
            .await?;
        Ok(self.balance.activate_service(request).await?)
    }

    /// Returns the caller's active layanan records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is active.
    pub async fn get_my_layanan_aktif(&self, caller: &Principal) -> EngineResult<Vec<Layanan>> {
        self.require_active(caller, "list own services").await?;
        Ok(self.balance.get_my_layanan_aktif(caller).await?)
    }

    /// Administratively pauses an active layanan.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active admin-level user, and the ledger errors otherwise.
    pub async fn mark_service_dormant(
        &self,
        caller: &Principal,
        layanan_id: LayananId,
    ) -> EngineResult<Layanan> {
        self.require_admin_level(caller, "pause services").await?;
        Ok(self.balance.mark_dormant(layanan_id).await?)
    }

    /// Returns a client's primary layanan; restricted to the client
    /// itself and internal staff.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] for other callers.
    pub async fn get_client_main_service(
        &self,
        caller: &Principal,
        client: &Principal,
    ) -> EngineResult<Option<Layanan>> {
        if caller == client {
            self.require_active(caller, "read own main service").await?;
        } else {
            self.require_role(caller, &INTERNAL_STAFF, "read client services")
                .await?;
        }
        Ok(self.balance.get_client_main_service(client).await?)
    }

    // -----------------------------------------------------------------
    // Task lifecycle
    // -----------------------------------------------------------------

    /// Creates a task against the caller's layanan.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active client, and the lifecycle errors (insufficient balance
    /// included) otherwise.
    pub async fn create_task(
        &self,
        caller: Principal,
        layanan_id: LayananId,
        judul: impl Into<String> + Send,
        detail_permintaan: impl Into<String> + Send,
    ) -> EngineResult<Task> {
        self.require_role(&caller, &[Role::Client], "create tasks").await?;
        Ok(self
            .lifecycle
            .create_task(caller, layanan_id, judul, detail_permintaan)
            .await?)
    }

    /// Records the internal estimate for a task.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is active
    /// internal staff.
    pub async fn input_estimasi_am(
        &self,
        caller: &Principal,
        task_id: TaskId,
        hours: u64,
    ) -> EngineResult<Task> {
        self.require_role(caller, &INTERNAL_STAFF, "record estimates")
            .await?;
        Ok(self.lifecycle.input_estimasi_am(task_id, hours).await?)
    }

    /// Applies the owning client's approval of the estimate.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is the
    /// task's active client.
    pub async fn approve_estimasi_client(
        &self,
        caller: &Principal,
        task_id: TaskId,
    ) -> EngineResult<Task> {
        self.require_active(caller, "approve estimates").await?;
        self.require_task_owner(caller, task_id, "approve estimates")
            .await?;
        Ok(self.lifecycle.approve_estimasi_client(task_id).await?)
    }

    /// Delegates a task to a partner.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is active
    /// internal staff.
    pub async fn assign_partner(
        &self,
        caller: &Principal,
        task_id: TaskId,
        request: AssignPartnerRequest,
    ) -> EngineResult<Task> {
        self.require_role(caller, &INTERNAL_STAFF, "assign partners")
            .await?;
        Ok(self.lifecycle.assign_partner(task_id, request).await?)
    }

    /// Applies the caller partner's accept/reject response.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active partner; the domain additionally verifies the caller is the
    /// assigned partner.
    pub async fn respon_partner(
        &self,
        caller: &Principal,
        task_id: TaskId,
        accept: bool,
    ) -> EngineResult<Task> {
        self.require_role(caller, &[Role::Partner], "respond to assignments")
            .await?;
        Ok(self.lifecycle.respon_partner(task_id, caller, accept).await?)
    }

    /// Applies a generic working-cycle status transition.
    ///
    /// Internal staff may drive every legal transition; the owning client
    /// may additionally send a reviewed task back to revision.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] for other callers and the
    /// transition errors otherwise.
    pub async fn update_task_status(
        &self,
        caller: &Principal,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> EngineResult<Task> {
        let user = self.require_active(caller, "update task status").await?;
        let is_staff = INTERNAL_STAFF.contains(&user.role());
        if !is_staff {
            let client_revision = user.role() == Role::Client
                && new_status == TaskStatus::Revision
                && self.owns_task(caller, task_id).await?;
            if !client_revision {
                return Err(EngineError::Unauthorized {
                    caller: caller.clone(),
                    action: "update task status",
                });
            }
        }
        Ok(self.lifecycle.update_task_status(task_id, new_status).await?)
    }

    /// Completes a client-approved task and returns its settlement.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is active
    /// internal staff, and the completion errors otherwise.
    pub async fn complete_task(
        &self,
        caller: &Principal,
        task_id: TaskId,
    ) -> EngineResult<FinancialResult> {
        self.require_role(caller, &INTERNAL_STAFF, "complete tasks")
            .await?;
        Ok(self.lifecycle.complete_task(task_id).await?)
    }

    /// Returns a client's tasks in their client-facing projection,
    /// delegation churn masked.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is the
    /// client itself or active internal staff.
    pub async fn get_client_tasks(
        &self,
        caller: &Principal,
        client: &Principal,
    ) -> EngineResult<Vec<TaskClientView>> {
        if caller == client {
            self.require_active(caller, "list own tasks").await?;
        } else {
            self.require_role(caller, &INTERNAL_STAFF, "list client tasks")
                .await?;
        }
        let tasks = self.lifecycle.get_client_tasks(client).await?;
        Ok(tasks.iter().map(TaskClientView::from_task).collect())
    }

    // -----------------------------------------------------------------
    // Finance
    // -----------------------------------------------------------------

    /// Files a withdrawal request for the caller partner.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active partner, and the withdrawal errors otherwise.
    pub async fn request_withdraw(
        &self,
        caller: Principal,
        amount: u64,
    ) -> EngineResult<WithdrawRequest> {
        self.require_role(&caller, &[Role::Partner], "request withdrawals")
            .await?;
        Ok(self.withdraw.request_withdraw(caller, amount).await?)
    }

    /// Approves a withdrawal and debits the partner balance.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is active
    /// finance staff.
    pub async fn approve_withdraw(
        &self,
        caller: Principal,
        id: WithdrawId,
    ) -> EngineResult<WithdrawRequest> {
        let finance = self
            .require_role(&caller, &[Role::Finance], "approve withdrawals")
            .await?;
        Ok(self
            .withdraw
            .approve_withdraw(finance.principal().clone(), id)
            .await?)
    }

    /// Rejects a withdrawal without debit.
    ///
    /// # Errors
    ///
    /// As for [`Engine::approve_withdraw`].
    pub async fn reject_withdraw(
        &self,
        caller: Principal,
        id: WithdrawId,
    ) -> EngineResult<WithdrawRequest> {
        let finance = self
            .require_role(&caller, &[Role::Finance], "reject withdrawals")
            .await?;
        Ok(self
            .withdraw
            .reject_withdraw(finance.principal().clone(), id)
            .await?)
    }

    /// Manually credits a partner balance (administrative correction).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] unless the caller is an
    /// active admin-level user.
    pub async fn add_partner_balance(
        &self,
        caller: &Principal,
        partner: &Principal,
        amount: u64,
    ) -> EngineResult<u64> {
        self.require_admin_level(caller, "adjust partner balances")
            .await?;
        Ok(self.withdraw.add_partner_balance(partner, amount).await?)
    }

    /// Returns a partner's balance; restricted to the partner itself,
    /// finance staff and admin-level users.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] for other callers.
    pub async fn get_partner_balance(
        &self,
        caller: &Principal,
        partner: &Principal,
    ) -> EngineResult<u64> {
        if caller == partner {
            self.require_active(caller, "read own balance").await?;
        } else {
            self.require_role(
                caller,
                &[Role::Finance, Role::Admin, Role::Superadmin],
                "read partner balances",
            )
            .await?;
        }
        Ok(self.withdraw.get_partner_balance(partner).await?)
    }

    /// Returns a partner's withdrawal requests; same access rule as
    /// [`Engine::get_partner_balance`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] for other callers.
    pub async fn list_withdraws(
        &self,
        caller: &Principal,
        partner: &Principal,
    ) -> EngineResult<Vec<WithdrawRequest>> {
        if caller == partner {
            self.require_active(caller, "list own withdrawals").await?;
        } else {
            self.require_role(
                caller,
                &[Role::Finance, Role::Admin, Role::Superadmin],
                "list partner withdrawals",
            )
            .await?;
        }
        Ok(self.withdraw.list_withdraws(partner).await?)
    }

    // -----------------------------------------------------------------
    // Authorization helpers
    // -----------------------------------------------------------------

    async fn find_user(&self, principal: &Principal) -> EngineResult<Option<User>> {
        self.users
            .find_by_principal(principal)
            .await
            .map_err(|err| EngineError::Approval(err.into()))
    }

    async fn require_active(
        &self,
        caller: &Principal,
        action: &'static str,
    ) -> EngineResult<User> {
        let user = self.find_user(caller).await?;
        user.filter(User::is_active)
            .ok_or_else(|| EngineError::Unauthorized {
                caller: caller.clone(),
                action,
            })
    }

    async fn require_role(
        &self,
        caller: &Principal,
        allowed: &[Role],
        action: &'static str,
    ) -> EngineResult<User> {
        let user = self.require_active(caller, action).await?;
        if allowed.contains(&user.role()) {
            Ok(user)
        } else {
            Err(EngineError::Unauthorized {
                caller: caller.clone(),
                action,
            })
        }
    }

    async fn require_admin_level(
        &self,
        caller: &Principal,
        action: &'static str,
    ) -> EngineResult<User> {
        let user = self.require_active(caller, action).await?;
        if user.role().is_admin_level() {
            Ok(user)
        } else {
            Err(EngineError::Unauthorized {
                caller: caller.clone(),
                action,
            })
        }
    }

    async fn owns_task(&self, caller: &Principal, task_id: TaskId) -> EngineResult<bool> {
        let task = self.lifecycle.get_task(task_id).await?;
        Ok(task.is_some_and(|task| task.client() == caller))
    }

    async fn require_task_owner(
        &self,
        caller: &Principal,
        task_id: TaskId,
        action: &'static str,
    ) -> EngineResult<()> {
        if self.owns_task(caller, task_id).await? {
            Ok(())
        } else {
            Err(EngineError::Unauthorized {
                caller: caller.clone(),
                action,
            })
        }
    }
}

/// Engine wired to the in-memory adapters and the system clock.
///
/// Every instance starts from empty stores, giving tests the isolation
/// required of the process-wide registry state.
pub type InMemoryEngine = Engine<
    crate::registry::adapters::memory::InMemoryUserRepository,
    crate::ledger::adapters::memory::InMemoryLayananRepository,
    crate::task::adapters::memory::InMemoryTaskRepository,
    crate::finance::adapters::memory::InMemoryFinanceRepository,
    mockable::DefaultClock,
>;

impl InMemoryEngine {
    /// Creates an engine over fresh, empty in-memory stores with the
    /// default fee schedule.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(crate::registry::adapters::memory::InMemoryUserRepository::new()),
            Arc::new(crate::ledger::adapters::memory::InMemoryLayananRepository::new()),
            Arc::new(crate::task::adapters::memory::InMemoryTaskRepository::new()),
            Arc::new(crate::finance::adapters::memory::InMemoryFinanceRepository::new()),
            FeeSchedule::default(),
            Arc::new(mockable::DefaultClock),
        )
    }
}
