//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning client principal.
    pub client: String,
    /// Layanan the task draws hours from.
    pub layanan_id: uuid::Uuid,
    /// Task title.
    pub judul: String,
    /// Request detail.
    pub detail_permintaan: String,
    /// Lifecycle status.
    pub status: String,
    /// Recorded estimate, if any.
    pub estimasi_jam: Option<i64>,
    /// Whether the client approved the estimate.
    pub estimasi_disetujui: bool,
    /// Hours held against the layanan.
    pub jam_reserved: i64,
    /// Delegation payload, if a partner is assigned.
    pub internal_data: Option<Value>,
    /// Client-facing drive link, if any.
    pub link_drive_client: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning client principal.
    pub client: String,
    /// Layanan the task draws hours from.
    pub layanan_id: uuid::Uuid,
    /// Task title.
    pub judul: String,
    /// Request detail.
    pub detail_permintaan: String,
    /// Lifecycle status.
    pub status: String,
    /// Recorded estimate, if any.
    pub estimasi_jam: Option<i64>,
    /// Whether the client approved the estimate.
    pub estimasi_disetujui: bool,
    /// Hours held against the layanan.
    pub jam_reserved: i64,
    /// Delegation payload, if a partner is assigned.
    pub internal_data: Option<Value>,
    /// Client-facing drive link, if any.
    pub link_drive_client: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
