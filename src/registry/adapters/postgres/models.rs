//! Diesel row models for user registry persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// External principal text.
    pub principal: String,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Optional business/company name.
    pub company: Option<String>,
    /// Optional city of residence.
    pub kota: Option<String>,
    /// Platform role.
    pub role: String,
    /// Registration status.
    pub status: String,
    /// Approval decision payload, if decided.
    pub decision: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct NewUserRow {
    /// External principal text.
    pub principal: String,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Optional business/company name.
    pub company: Option<String>,
    /// Optional city of residence.
    pub kota: Option<String>,
    /// Platform role.
    pub role: String,
    /// Registration status.
    pub status: String,
    /// Approval decision payload, if decided.
    pub decision: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
