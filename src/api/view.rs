//! Client-facing task views with status masking.

use crate::ledger::domain::LayananId;
use crate::registry::domain::Principal;
use crate::task::domain::{InternalData, Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

/// Display label shown to clients while a task is between partners.
///
/// `PendingPartner` and `RejectedByPartner` collapse into this single
/// label so partner-assignment churn stays invisible to clients; the
/// underlying statuses remain distinct in storage.
pub const LABEL_SEDANG_DIDELEGASIKAN: &str = "Sedang Didelegasikan";

/// Returns the client-facing label for a task status.
#[must_use]
pub const fn client_facing_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::PendingPartner | TaskStatus::RejectedByPartner => {
            LABEL_SEDANG_DIDELEGASIKAN
        }
        other => other.as_str(),
    }
}

/// Client-facing projection of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskClientView {
    /// Task identifier.
    pub id: TaskId,
    /// Owning client.
    pub client_id: Principal,
    /// Layanan the task draws hours from.
    pub layanan_id: LayananId,
    /// Task title.
    pub judul: String,
    /// Request detail.
    pub detail_permintaan: String,
    /// Masked, display-ready status label.
    pub status: String,
    /// Recorded estimate in hours (zero until estimated).
    pub estimasi_jam: u64,
    /// Delegation data, when a partner has been assigned.
    pub internal_data: Option<InternalData>,
    /// Client drive link, if any.
    pub link_drive_client: Option<String>,
}

impl TaskClientView {
    /// Projects a task into its client-facing form.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id(),
            client_id: task.client().clone(),
            layanan_id: task.layanan_id(),
            judul: task.judul().to_owned(),
            detail_permintaan: task.detail_permintaan().to_owned(),
            status: client_facing_label(task.status()).to_owned(),
            estimasi_jam: task.estimasi_jam().unwrap_or(0),
            internal_data: task.internal_data().cloned(),
            link_drive_client: task.link_drive_client().map(str::to_owned),
        }
    }
}
