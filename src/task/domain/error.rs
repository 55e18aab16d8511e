//! Error types for task domain validation.

use super::ids::TaskId;
use super::task::TaskStatus;
use crate::registry::domain::Principal;
use thiserror::Error;

/// Errors returned while constructing or mutating task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyJudul,

    /// The request detail is empty after trimming.
    #[error("request detail must not be empty")]
    EmptyDetail,

    /// The estimate must be at least one hour.
    #[error("estimate must be at least one hour")]
    InvalidEstimasi,

    /// The requested status change is not a legal transition.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Target task.
        task_id: TaskId,
        /// Status the task held when the transition was attempted.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The task has already completed and settled.
    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    /// The operation requires an estimate that has not been recorded.
    #[error("task {0} has no recorded estimate")]
    EstimasiMissing(TaskId),

    /// The operation requires an assigned partner.
    #[error("task {0} has no assigned partner")]
    PartnerNotAssigned(TaskId),

    /// The responding principal is not the assigned partner.
    #[error("{partner} is not the partner assigned to task {task_id}")]
    NotAssignedPartner {
        /// Target task.
        task_id: TaskId,
        /// Principal that attempted the response.
        partner: Principal,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
