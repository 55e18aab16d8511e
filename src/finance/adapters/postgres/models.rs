//! Diesel row models for finance persistence.

use super::schema::{partner_balances, settlements, withdraws};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for settlement records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = settlements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SettlementRow {
    /// Settled task identifier.
    pub task_id: uuid::Uuid,
    /// Task status recorded at settlement.
    pub task_status: String,
    /// Hours burned from the service balance.
    pub jam_dibakar: i64,
    /// Settlement value.
    pub nilai_tugas: i64,
    /// Platform fee share.
    pub platform_fee: i64,
    /// Partner fee share.
    pub partner_fee: i64,
    /// Referral fee share.
    pub partner_referral_fee: i64,
    /// Amount payable to the partner.
    pub jumlah_bayar: i64,
    /// Settlement timestamp.
    pub settled_at: DateTime<Utc>,
}

/// Row model for partner balances.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = partner_balances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PartnerBalanceRow {
    /// Partner principal.
    pub partner: String,
    /// Current balance.
    pub saldo: i64,
}

/// Query result row for withdrawal requests.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = withdraws)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WithdrawRow {
    /// Withdrawal identifier.
    pub id: uuid::Uuid,
    /// Requesting partner principal.
    pub partner: String,
    /// Requested amount.
    pub amount: i64,
    /// Request status.
    pub status: String,
    /// Resolving finance principal, if resolved.
    pub resolved_by: Option<String>,
    /// Resolution timestamp, if resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Request timestamp.
    pub requested_at: DateTime<Utc>,
}

/// Insert model for withdrawal requests.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = withdraws)]
#[diesel(treat_none_as_null = true)]
pub struct NewWithdrawRow {
    /// Withdrawal identifier.
    pub id: uuid::Uuid,
    /// Requesting partner principal.
    pub partner: String,
    /// Requested amount.
    pub amount: i64,
    /// Request status.
    pub status: String,
    /// Resolving finance principal, if resolved.
    pub resolved_by: Option<String>,
    /// Resolution timestamp, if resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Request timestamp.
    pub requested_at: DateTime<Utc>,
}
