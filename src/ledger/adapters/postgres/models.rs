//! Diesel row models for layanan ledger persistence.

use super::schema::layanan;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for layanan records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = layanan)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LayananRow {
    /// Layanan identifier.
    pub id: uuid::Uuid,
    /// Owning client principal.
    pub client: String,
    /// Assigned account manager principal.
    pub asistenmu: String,
    /// Service type.
    pub jenis: String,
    /// Staffing model.
    pub resource_type: String,
    /// Lifecycle status.
    pub status: String,
    /// Sale price per unit.
    pub harga_per_unit: i64,
    /// Hourly tariff used for settlement.
    pub tarif_per_jam: i64,
    /// Hour balance at activation.
    pub saldo_original: i64,
    /// Spendable hour balance.
    pub saldo_jam_efektif: i64,
    /// Hours reserved against in-flight tasks.
    pub jam_on_hold: i64,
    /// Optional service deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Optional scope description.
    pub scope: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for layanan records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = layanan)]
#[diesel(treat_none_as_null = true)]
pub struct NewLayananRow {
    /// Layanan identifier.
    pub id: uuid::Uuid,
    /// Owning client principal.
    pub client: String,
    /// Assigned account manager principal.
    pub asistenmu: String,
    /// Service type.
    pub jenis: String,
    /// Staffing model.
    pub resource_type: String,
    /// Lifecycle status.
    pub status: String,
    /// Sale price per unit.
    pub harga_per_unit: i64,
    /// Hourly tariff used for settlement.
    pub tarif_per_jam: i64,
    /// Hour balance at activation.
    pub saldo_original: i64,
    /// Spendable hour balance.
    pub saldo_jam_efektif: i64,
    /// Hours reserved against in-flight tasks.
    pub jam_on_hold: i64,
    /// Optional service deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Optional scope description.
    pub scope: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
