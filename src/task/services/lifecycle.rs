//! Service layer orchestrating the task lifecycle against the ledger and
//! finance ports.

use crate::finance::{
    domain::{FeeSchedule, FinanceDomainError, FinancialResult},
    ports::{FinanceRepository, FinanceRepositoryError},
};
use crate::ledger::{
    domain::{HOURS_PER_UNIT, LayananId},
    ports::{LayananRepository, LayananRepositoryError},
};
use crate::registry::domain::Principal;
use crate::task::{
    domain::{InternalData, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for delegating a task to a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignPartnerRequest {
    partner: Principal,
    scope_kerja: String,
    deadline: DateTime<Utc>,
    link_drive_internal: String,
    jam_efektif: u64,
    level_partner: String,
}

impl AssignPartnerRequest {
    /// Creates a request with the full delegation data.
    #[must_use]
    pub fn new(
        partner: Principal,
        scope_kerja: impl Into<String>,
        deadline: DateTime<Utc>,
        link_drive_internal: impl Into<String>,
        jam_efektif: u64,
        level_partner: impl Into<String>,
    ) -> Self {
        Self {
            partner,
            scope_kerja: scope_kerja.into(),
            deadline,
            link_drive_internal: link_drive_internal.into(),
            jam_efektif,
            level_partner: level_partner.into(),
        }
    }

    fn into_internal_data(self) -> InternalData {
        InternalData {
            partner_id: self.partner,
            scope_kerja: self.scope_kerja,
            deadline: self.deadline,
            link_drive_internal: self.link_drive_internal,
            jam_efektif: self.jam_efektif,
            level_partner: self.level_partner,
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Ledger operation failed (insufficient balance included).
    #[error(transparent)]
    Ledger(#[from] LayananRepositoryError),
    /// Settlement operation failed.
    #[error(transparent)]
    Finance(#[from] FinanceRepositoryError),
    /// Fee computation failed.
    #[error(transparent)]
    Settlement(#[from] FinanceDomainError),
    /// The task is not registered.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The layanan does not belong to the requesting client.
    #[error("layanan {layanan_id} does not belong to client {client}")]
    LayananNotOwned {
        /// Target layanan.
        layanan_id: LayananId,
        /// Requesting client.
        client: Principal,
    },
    /// Completion must go through `complete_task` so settlement runs.
    #[error("task completion must go through the completion operation")]
    CompletionRequiresSettlement,
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Coordinates the task state machine with the layanan ledger (hour
/// reservation and burning) and the finance ledger (settlement recording
/// and partner credit).
#[derive(Clone)]
pub struct TaskLifecycleService<T, L, F, C>
where
    T: TaskRepository,
    L: LayananRepository,
    F: FinanceRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    layanan: Arc<L>,
    finance: Arc<F>,
    fees: FeeSchedule,
    clock: Arc<C>,
}

impl<T, L, F, C> TaskLifecycleService<T, L, F, C>
where
    T: TaskRepository,
    L: LayananRepository,
    F: FinanceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        layanan: Arc<L>,
        finance: Arc<F>,
        fees: FeeSchedule,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            layanan,
            finance,
            fees,
            clock,
        }
    }

    /// Creates a task against the client's layanan, reserving the minimum
    /// one billing unit of hours.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::LayananNotOwned`] when the layanan
    /// belongs to another client and [`LayananRepositoryError::Domain`]
    /// carrying `InsufficientBalance` when the available hours cannot
    /// cover the reservation.
    pub async fn create_task(
        &self,
        client: Principal,
        layanan_id: LayananId,
        judul: impl Into<String> + Send,
        detail_permintaan: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let record = self
            .layanan
            .find_by_id(layanan_id)
            .await?
            .ok_or(LayananRepositoryError::NotFound(layanan_id))?;
        if record.client() != &client {
            return Err(TaskLifecycleError::LayananNotOwned { layanan_id, client });
        }

        let now = self.clock.utc();
        // The reservation is the atomic admission check: when it succeeds
        // the hours are held before the task record exists.
        self.layanan
            .reserve_hours(layanan_id, HOURS_PER_UNIT, now)
            .await?;

        let task = Task::new(
            client,
            layanan_id,
            judul,
            detail_permintaan,
            HOURS_PER_UNIT,
            now,
        )?;
        self.tasks.store(&task).await?;
        info!(
            task_id = %task.id(),
            layanan_id = %layanan_id,
            jam_reserved = task.jam_reserved(),
            "task requested"
        );
        Ok(task)
    }

    /// Records the internal estimate and queues the task for client
    /// approval.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// the domain transition errors otherwise.
    pub async fn input_estimasi_am(
        &self,
        task_id: TaskId,
        hours: u64,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.set_estimasi(hours, self.clock.utc())?;
        self.tasks.update(&task).await?;
        info!(task_id = %task.id(), estimasi_jam = hours, "estimate recorded");
        Ok(task)
    }

    /// Applies the client's approval of the estimate and aligns the ledger
    /// hold with the approved hours.
    ///
    /// A larger estimate reserves the delta (which can fail
    /// `InsufficientBalance`); a smaller one releases the surplus back to
    /// the available pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks,
    /// [`TaskDomainError::EstimasiMissing`] when no estimate is recorded,
    /// and the ledger errors for the hold adjustment.
    pub async fn approve_estimasi_client(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        if task.status() != TaskStatus::AwaitingClientApproval {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id,
                from: task.status(),
                to: TaskStatus::PendingPartner,
            }
            .into());
        }
        let estimasi = task
            .estimasi_jam()
            .ok_or(TaskDomainError::EstimasiMissing(task_id))?;

        let now = self.clock.utc();
        let reserved = task.jam_reserved();
        if estimasi > reserved {
            self.layanan
                .reserve_hours(task.layanan_id(), estimasi - reserved, now)
                .await?;
        } else if reserved > estimasi {
            self.layanan
                .release_hours(task.layanan_id(), reserved - estimasi, now)
                .await?;
        }

        task.approve_estimasi(now)?;
        self.tasks.update(&task).await?;
        info!(
            task_id = %task.id(),
            jam_reserved = task.jam_reserved(),
            status = %task.status(),
            "estimate approved by client"
        );
        Ok(task)
    }

    /// Delegates the task to a partner with the full assignment data.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// the domain transition errors otherwise.
    pub async fn assign_partner(
        &self,
        task_id: TaskId,
        request: AssignPartnerRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.assign_partner(request.into_internal_data(), self.clock.utc())?;
        self.tasks.update(&task).await?;
        info!(task_id = %task.id(), status = %task.status(), "partner assigned");
        Ok(task)
    }

    /// Applies the partner's accept/reject response.
    ///
    /// Rejection keeps the ledger hold in place: the task stays funded
    /// while internal staff find another partner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// the domain response errors otherwise.
    pub async fn respon_partner(
        &self,
        task_id: TaskId,
        partner: &Principal,
        accept: bool,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.respond_partner(partner, accept, self.clock.utc())?;
        self.tasks.update(&task).await?;
        if accept {
            info!(task_id = %task.id(), partner = %partner, "partner accepted the task");
        } else {
            warn!(task_id = %task.id(), partner = %partner, "partner rejected the task");
        }
        Ok(task)
    }

    /// Applies a generic status transition for the working cycle
    /// (`OnProgress → InQA → ClientReview → Revision → OnProgress`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::CompletionRequiresSettlement`] when
    /// the target is [`TaskStatus::Completed`], and the domain transition
    /// errors for moves the graph does not permit.
    pub async fn update_task_status(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        if new_status == TaskStatus::Completed {
            return Err(TaskLifecycleError::CompletionRequiresSettlement);
        }
        let mut task = self.load(task_id).await?;
        task.transition_to(new_status, self.clock.utc())?;
        self.tasks.update(&task).await?;
        info!(task_id = %task.id(), status = %task.status(), "task status updated");
        Ok(task)
    }

    /// Completes a client-approved task: burns the reserved hours, records
    /// the settlement, credits the partner, and marks the task completed.
    ///
    /// A second call on a completed task fails `AlreadyCompleted` and
    /// leaves the ledger and the settlement record untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] on repeat calls,
    /// [`TaskDomainError::InvalidStateTransition`] unless the task is in
    /// [`TaskStatus::ClientReview`], and
    /// [`TaskDomainError::PartnerNotAssigned`] when no delegation data is
    /// present.
    pub async fn complete_task(&self, task_id: TaskId) -> TaskLifecycleResult<FinancialResult> {
        let mut task = self.load(task_id).await?;
        if task.status().is_terminal() {
            return Err(TaskDomainError::AlreadyCompleted(task_id).into());
        }
        if !task.status().can_transition_to(TaskStatus::Completed) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id,
                from: task.status(),
                to: TaskStatus::Completed,
            }
            .into());
        }
        let partner = task
            .internal_data()
            .map(|data| data.partner_id.clone())
            .ok_or(TaskDomainError::PartnerNotAssigned(task_id))?;

        let now = self.clock.utc();
        let jam_dibakar = task.jam_reserved();
        let burned = self
            .layanan
            .burn_hours(task.layanan_id(), jam_dibakar, now)
            .await?;

        let result = FinancialResult::settle(
            task_id,
            TaskStatus::Completed,
            jam_dibakar,
            burned.tarif_per_jam(),
            &self.fees,
            now,
        )?;
        // The settlement record is the idempotency backstop behind the
        // status guard above.
        self.finance.record_settlement(&result).await?;
        self.finance
            .credit_partner(&partner, result.jumlah_bayar())
            .await?;

        task.complete(now)?;
        self.tasks.update(&task).await?;
        info!(
            task_id = %task_id,
            jam_dibakar,
            jumlah_bayar = result.jumlah_bayar(),
            partner = %partner,
            "task completed and settled"
        );
        Ok(result)
    }

    /// Returns the client's tasks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the listing fails.
    pub async fn get_client_tasks(&self, client: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_by_client(client).await?)
    }

    /// Looks up a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}
