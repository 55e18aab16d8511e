//! Task aggregate root and the delegation lifecycle state machine.

use super::error::{ParseTaskStatusError, TaskDomainError};
use super::ids::TaskId;
use crate::ledger::domain::LayananId;
use crate::registry::domain::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The legal transition graph:
///
/// ```text
/// Requested -> AwaitingClientApproval -> PendingPartner
/// PendingPartner -> OnProgress | RejectedByPartner
/// RejectedByPartner -> PendingPartner
/// OnProgress -> InQA -> ClientReview -> Revision | Completed
/// Revision -> OnProgress
/// ```
///
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created by the client, awaiting an internal estimate.
    Requested,
    /// Estimate recorded, awaiting the client's approval.
    AwaitingClientApproval,
    /// Delegated to a partner, awaiting the partner's response.
    PendingPartner,
    /// Declined by the assigned partner, awaiting reassignment.
    RejectedByPartner,
    /// Accepted and being worked on by the partner.
    OnProgress,
    /// Work submitted to internal quality assurance.
    InQA,
    /// Passed QA, under review by the client.
    ClientReview,
    /// Returned by the client for rework.
    Revision,
    /// Completed and financially settled.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::AwaitingClientApproval => "AwaitingClientApproval",
            Self::PendingPartner => "PendingPartner",
            Self::RejectedByPartner => "RejectedByPartner",
            Self::OnProgress => "OnProgress",
            Self::InQA => "InQA",
            Self::ClientReview => "ClientReview",
            Self::Revision => "Revision",
            Self::Completed => "Completed",
        }
    }

    /// Returns true when `target` is a legal successor of this status.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Requested, Self::AwaitingClientApproval)
                | (Self::AwaitingClientApproval, Self::PendingPartner)
                | (Self::PendingPartner, Self::OnProgress | Self::RejectedByPartner)
                | (Self::RejectedByPartner, Self::PendingPartner)
                | (Self::OnProgress, Self::InQA)
                | (Self::InQA, Self::ClientReview)
                | (Self::ClientReview, Self::Revision | Self::Completed)
                | (Self::Revision, Self::OnProgress)
        )
    }

    /// Returns true for statuses that accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Requested" => Ok(Self::Requested),
            "AwaitingClientApproval" => Ok(Self::AwaitingClientApproval),
            "PendingPartner" => Ok(Self::PendingPartner),
            "RejectedByPartner" => Ok(Self::RejectedByPartner),
            "OnProgress" => Ok(Self::OnProgress),
            "InQA" => Ok(Self::InQA),
            "ClientReview" => Ok(Self::ClientReview),
            "Revision" => Ok(Self::Revision),
            "Completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delegation data populated when internal staff assign a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalData {
    /// Assigned partner principal.
    pub partner_id: Principal,
    /// Scope of work agreed with the partner.
    pub scope_kerja: String,
    /// Delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Shared drive link for working materials.
    pub link_drive_internal: String,
    /// Effective hours allotted to the partner.
    pub jam_efektif: u64,
    /// Partner seniority level for this assignment.
    pub level_partner: String,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    client: Principal,
    layanan_id: LayananId,
    judul: String,
    detail_permintaan: String,
    status: TaskStatus,
    estimasi_jam: Option<u64>,
    estimasi_disetujui: bool,
    jam_reserved: u64,
    internal_data: Option<InternalData>,
    link_drive_client: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning client.
    pub client: Principal,
    /// Persisted layanan reference.
    pub layanan_id: LayananId,
    /// Persisted title.
    pub judul: String,
    /// Persisted request detail.
    pub detail_permintaan: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted estimate, if recorded.
    pub estimasi_jam: Option<u64>,
    /// Persisted client approval of the estimate.
    pub estimasi_disetujui: bool,
    /// Persisted hours held against the layanan.
    pub jam_reserved: u64,
    /// Persisted delegation data, if assigned.
    pub internal_data: Option<InternalData>,
    /// Persisted client drive link, if any.
    pub link_drive_client: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new client request with its initial ledger reservation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyJudul`] or
    /// [`TaskDomainError::EmptyDetail`] when the text fields are empty
    /// after trimming.
    pub fn new(
        client: Principal,
        layanan_id: LayananId,
        judul: impl Into<String>,
        detail_permintaan: impl Into<String>,
        jam_reserved: u64,
        at: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let judul = judul.into();
        if judul.trim().is_empty() {
            return Err(TaskDomainError::EmptyJudul);
        }
        let detail_permintaan = detail_permintaan.into();
        if detail_permintaan.trim().is_empty() {
            return Err(TaskDomainError::EmptyDetail);
        }

        Ok(Self {
            id: TaskId::new(),
            client,
            layanan_id,
            judul: judul.trim().to_owned(),
            detail_permintaan: detail_permintaan.trim().to_owned(),
            status: TaskStatus::Requested,
            estimasi_jam: None,
            estimasi_disetujui: false,
            jam_reserved,
            internal_data: None,
            link_drive_client: None,
            created_at: at,
            updated_at: at,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            client: data.client,
            layanan_id: data.layanan_id,
            judul: data.judul,
            detail_permintaan: data.detail_permintaan,
            status: data.status,
            estimasi_jam: data.estimasi_jam,
            estimasi_disetujui: data.estimasi_disetujui,
            jam_reserved: data.jam_reserved,
            internal_data: data.internal_data,
            link_drive_client: data.link_drive_client,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client(&self) -> &Principal {
        &self.client
    }

    /// Returns the layanan the task draws hours from.
    #[must_use]
    pub const fn layanan_id(&self) -> LayananId {
        self.layanan_id
    }

    /// Returns the title.
    #[must_use]
    pub fn judul(&self) -> &str {
        &self.judul
    }

    /// Returns the request detail.
    #[must_use]
    pub fn detail_permintaan(&self) -> &str {
        &self.detail_permintaan
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the recorded estimate, if any.
    #[must_use]
    pub const fn estimasi_jam(&self) -> Option<u64> {
        self.estimasi_jam
    }

    /// Returns true when the client has approved the estimate.
    #[must_use]
    pub const fn estimasi_disetujui(&self) -> bool {
        self.estimasi_disetujui
    }

    /// Returns the hours currently held against the layanan.
    #[must_use]
    pub const fn jam_reserved(&self) -> u64 {
        self.jam_reserved
    }

    /// Returns the delegation data, if a partner has been assigned.
    #[must_use]
    pub const fn internal_data(&self) -> Option<&InternalData> {
        self.internal_data.as_ref()
    }

    /// Returns the client drive link, if any.
    #[must_use]
    pub fn link_drive_client(&self) -> Option<&str> {
        self.link_drive_client.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records the internal estimate and queues the task for client
    /// approval.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidEstimasi`] for a zero estimate and
    /// [`TaskDomainError::InvalidStateTransition`] unless the task is in
    /// [`TaskStatus::Requested`].
    pub fn set_estimasi(&mut self, hours: u64, at: DateTime<Utc>) -> Result<(), TaskDomainError> {
        if hours == 0 {
            return Err(TaskDomainError::InvalidEstimasi);
        }
        self.guarded_transition(TaskStatus::AwaitingClientApproval)?;
        self.estimasi_jam = Some(hours);
        self.touch(at);
        Ok(())
    }

    /// Marks the estimate approved by the client.
    ///
    /// The reservation tracked on the task is aligned to the approved
    /// estimate; the caller is responsible for the matching ledger
    /// adjustment. When a partner is already assigned the task moves
    /// straight to [`TaskStatus::PendingPartner`]; otherwise it stays
    /// queued in [`TaskStatus::AwaitingClientApproval`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EstimasiMissing`] when no estimate is
    /// recorded and [`TaskDomainError::InvalidStateTransition`] unless the
    /// task awaits client approval.
    pub fn approve_estimasi(&mut self, at: DateTime<Utc>) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::AwaitingClientApproval {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::PendingPartner,
            });
        }
        let estimasi = self
            .estimasi_jam
            .ok_or(TaskDomainError::EstimasiMissing(self.id))?;

        self.estimasi_disetujui = true;
        self.jam_reserved = estimasi;
        if self.internal_data.is_some() {
            self.status = TaskStatus::PendingPartner;
        }
        self.touch(at);
        Ok(())
    }

    /// Assigns (or reassigns) a partner with the delegation data.
    ///
    /// Allowed while the task awaits client approval, awaits a partner
    /// response, or after a partner rejection. The task moves to
    /// [`TaskStatus::PendingPartner`] once the estimate has been approved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] from any other
    /// status.
    pub fn assign_partner(
        &mut self,
        data: InternalData,
        at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        let assignable = matches!(
            self.status,
            TaskStatus::AwaitingClientApproval
                | TaskStatus::PendingPartner
                | TaskStatus::RejectedByPartner
        );
        if !assignable {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::PendingPartner,
            });
        }

        self.internal_data = Some(data);
        if self.estimasi_disetujui && self.status != TaskStatus::PendingPartner {
            self.status = TaskStatus::PendingPartner;
        }
        self.touch(at);
        Ok(())
    }

    /// Applies the assigned partner's accept/reject response.
    ///
    /// Acceptance moves the task to [`TaskStatus::OnProgress`]; rejection
    /// moves it to [`TaskStatus::RejectedByPartner`] while the ledger hold
    /// stays in place pending reassignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is pending a partner response,
    /// [`TaskDomainError::PartnerNotAssigned`] when no delegation data is
    /// present, and [`TaskDomainError::NotAssignedPartner`] when the
    /// responder is not the assigned partner.
    pub fn respond_partner(
        &mut self,
        partner: &Principal,
        accept: bool,
        at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::PendingPartner {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: if accept {
                    TaskStatus::OnProgress
                } else {
                    TaskStatus::RejectedByPartner
                },
            });
        }
        let assigned = self
            .internal_data
            .as_ref()
            .ok_or(TaskDomainError::PartnerNotAssigned(self.id))?;
        if assigned.partner_id != *partner {
            return Err(TaskDomainError::NotAssignedPartner {
                task_id: self.id,
                partner: partner.clone(),
            });
        }

        self.status = if accept {
            TaskStatus::OnProgress
        } else {
            TaskStatus::RejectedByPartner
        };
        self.touch(at);
        Ok(())
    }

    /// Applies a generic status transition, validated against the graph.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyCompleted`] on a completed task
    /// and [`TaskDomainError::InvalidStateTransition`] for any move the
    /// graph does not permit. The task is untouched on error.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        at: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        self.guarded_transition(target)?;
        self.touch(at);
        Ok(())
    }

    /// Completes the task from the client-approved review state.
    ///
    /// # Errors
    ///
    /// As for [`Task::transition_to`] with [`TaskStatus::Completed`] as the
    /// target.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Completed, at)
    }

    /// Records the client-facing drive link.
    pub fn set_link_drive_client(&mut self, link: impl Into<String>, at: DateTime<Utc>) {
        self.link_drive_client = Some(link.into());
        self.touch(at);
    }

    fn guarded_transition(&mut self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::AlreadyCompleted(self.id));
        }
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    const fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
