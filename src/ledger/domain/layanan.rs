//! Layanan aggregate root: a client's purchased service package with an
//! effective-hour balance and hold accounting.

use super::error::{
    LedgerDomainError, ParseJenisLayananError, ParseLayananStatusError, ParseResourceTypeError,
};
use super::ids::LayananId;
use crate::registry::domain::Principal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing conversion: one purchased unit grants two effective hours.
pub const HOURS_PER_UNIT: u64 = 2;

/// Service package type offered to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JenisLayanan {
    /// Report writing engagements.
    ReportWriting,
    /// General assistance engagements.
    Assistance,
    /// Data entry engagements.
    DataEntry,
}

impl JenisLayanan {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReportWriting => "report_writing",
            Self::Assistance => "assistance",
            Self::DataEntry => "data_entry",
        }
    }
}

impl TryFrom<&str> for JenisLayanan {
    type Error = ParseJenisLayananError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "report_writing" => Ok(Self::ReportWriting),
            "assistance" => Ok(Self::Assistance),
            "data_entry" => Ok(Self::DataEntry),
            _ => Err(ParseJenisLayananError(value.to_owned())),
        }
    }
}

impl fmt::Display for JenisLayanan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Staffing model backing the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Dedicated staff assigned to the client.
    Dedicated,
    /// Shared standard staffing pool.
    Standard,
}

impl ResourceType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dedicated => "dedicated",
            Self::Standard => "standard",
        }
    }
}

impl TryFrom<&str> for ResourceType {
    type Error = ParseResourceTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "dedicated" => Ok(Self::Dedicated),
            "standard" => Ok(Self::Standard),
            _ => Err(ParseResourceTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a layanan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayananStatus {
    /// Created but awaiting activation approval.
    PendingApproval,
    /// Active and accepting reservations.
    Active,
    /// Administratively paused; no new reservations.
    Dormant,
    /// Balance fully consumed; terminal for reservations.
    Depleted,
}

impl LayananStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Active => "active",
            Self::Dormant => "dormant",
            Self::Depleted => "depleted",
        }
    }
}

impl TryFrom<&str> for LayananStatus {
    type Error = ParseLayananStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "pending_approval" => Ok(Self::PendingApproval),
            "active" => Ok(Self::Active),
            "dormant" => Ok(Self::Dormant),
            "depleted" => Ok(Self::Depleted),
            _ => Err(ParseLayananStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for LayananStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Layanan aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layanan {
    id: LayananId,
    client: Principal,
    asistenmu: Principal,
    jenis: JenisLayanan,
    resource_type: ResourceType,
    status: LayananStatus,
    harga_per_unit: u64,
    tarif_per_jam: u64,
    saldo_original: u64,
    saldo_jam_efektif: u64,
    jam_on_hold: u64,
    deadline: Option<DateTime<Utc>>,
    scope: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted layanan aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLayananData {
    /// Persisted layanan identifier.
    pub id: LayananId,
    /// Persisted owning client.
    pub client: Principal,
    /// Persisted assigned account manager.
    pub asistenmu: Principal,
    /// Persisted service type.
    pub jenis: JenisLayanan,
    /// Persisted resource type.
    pub resource_type: ResourceType,
    /// Persisted status.
    pub status: LayananStatus,
    /// Persisted price per unit.
    pub harga_per_unit: u64,
    /// Persisted hourly tariff.
    pub tarif_per_jam: u64,
    /// Persisted hour balance at activation.
    pub saldo_original: u64,
    /// Persisted spendable hour balance.
    pub saldo_jam_efektif: u64,
    /// Persisted hours on hold.
    pub jam_on_hold: u64,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted scope description, if any.
    pub scope: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Activation parameters validated by [`Layanan::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayananActivation {
    /// Owning client.
    pub client: Principal,
    /// Assigned account manager.
    pub asistenmu: Principal,
    /// Service type.
    pub jenis: JenisLayanan,
    /// Staffing model; defaults to [`ResourceType::Standard`].
    pub resource_type: ResourceType,
    /// Purchased unit count (≥ 1).
    pub units: u64,
    /// Sale price per unit (> 0).
    pub harga_per_unit: u64,
    /// Optional service deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Optional scope description.
    pub scope: Option<String>,
}

impl Layanan {
    /// Activates a new layanan from validated purchase parameters.
    ///
    /// The spendable balance is `units × HOURS_PER_UNIT`; the hourly tariff
    /// is derived once here so settlement never re-derives pricing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::InvalidUnitCount`] when `units` is zero
    /// and [`LedgerDomainError::InvalidPrice`] when the unit price is zero.
    pub fn activate(
        activation: LayananActivation,
        at: DateTime<Utc>,
    ) -> Result<Self, LedgerDomainError> {
        if activation.units == 0 {
            return Err(LedgerDomainError::InvalidUnitCount(activation.units));
        }
        if activation.harga_per_unit == 0 {
            return Err(LedgerDomainError::InvalidPrice);
        }
        let saldo = activation.units.saturating_mul(HOURS_PER_UNIT);
        let tarif_per_jam = activation.harga_per_unit / HOURS_PER_UNIT;

        Ok(Self {
            id: LayananId::new(),
            client: activation.client,
            asistenmu: activation.asistenmu,
            jenis: activation.jenis,
            resource_type: activation.resource_type,
            status: LayananStatus::Active,
            harga_per_unit: activation.harga_per_unit,
            tarif_per_jam,
            saldo_original: saldo,
            saldo_jam_efektif: saldo,
            jam_on_hold: 0,
            deadline: activation.deadline,
            scope: activation.scope,
            created_at: at,
            updated_at: at,
        })
    }

    /// Reconstructs a layanan from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLayananData) -> Self {
        Self {
            id: data.id,
            client: data.client,
            asistenmu: data.asistenmu,
            jenis: data.jenis,
            resource_type: data.resource_type,
            status: data.status,
            harga_per_unit: data.harga_per_unit,
            tarif_per_jam: data.tarif_per_jam,
            saldo_original: data.saldo_original,
            saldo_jam_efektif: data.saldo_jam_efektif,
            jam_on_hold: data.jam_on_hold,
            deadline: data.deadline,
            scope: data.scope,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the layanan identifier.
    #[must_use]
    pub const fn id(&self) -> LayananId {
        self.id
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client(&self) -> &Principal {
        &self.client
    }

    /// Returns the assigned account manager.
    #[must_use]
    pub const fn asistenmu(&self) -> &Principal {
        &self.asistenmu
    }

    /// Returns the service type.
    #[must_use]
    pub const fn jenis(&self) -> JenisLayanan {
        self.jenis
    }

    /// Returns the staffing model.
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> LayananStatus {
        self.status
    }

    /// Returns the sale price per unit.
    #[must_use]
    pub const fn harga_per_unit(&self) -> u64 {
        self.harga_per_unit
    }

    /// Returns the hourly tariff used for settlement.
    #[must_use]
    pub const fn tarif_per_jam(&self) -> u64 {
        self.tarif_per_jam
    }

    /// Returns the hour balance granted at activation.
    #[must_use]
    pub const fn saldo_original(&self) -> u64 {
        self.saldo_original
    }

    /// Returns the spendable hour balance.
    #[must_use]
    pub const fn saldo_jam_efektif(&self) -> u64 {
        self.saldo_jam_efektif
    }

    /// Returns the hours reserved against in-flight tasks.
    #[must_use]
    pub const fn jam_on_hold(&self) -> u64 {
        self.jam_on_hold
    }

    /// Returns the hours available for new reservations.
    #[must_use]
    pub const fn jam_tersedia(&self) -> u64 {
        self.saldo_jam_efektif.saturating_sub(self.jam_on_hold)
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the scope description, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves `hours` from the available pool onto hold.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::NotActive`] unless the layanan is
    /// active, [`LedgerDomainError::InvalidHours`] for a zero amount, and
    /// [`LedgerDomainError::InsufficientBalance`] when the available pool
    /// cannot cover the reservation. The record is untouched on error.
    pub fn reserve(&mut self, hours: u64, at: DateTime<Utc>) -> Result<(), LedgerDomainError> {
        if self.status != LayananStatus::Active {
            return Err(LedgerDomainError::NotActive {
                layanan_id: self.id,
                status: self.status,
            });
        }
        if hours == 0 {
            return Err(LedgerDomainError::InvalidHours);
        }
        let available = self.jam_tersedia();
        if hours > available {
            return Err(LedgerDomainError::InsufficientBalance {
                layanan_id: self.id,
                requested: hours,
                available,
            });
        }
        self.jam_on_hold += hours;
        self.updated_at = at;
        Ok(())
    }

    /// Returns `hours` from hold to the available pool without burning.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::InvalidHours`] for a zero amount and
    /// [`LedgerDomainError::HoldExceeded`] when `hours` exceeds the current
    /// hold.
    pub fn release(&mut self, hours: u64, at: DateTime<Utc>) -> Result<(), LedgerDomainError> {
        if hours == 0 {
            return Err(LedgerDomainError::InvalidHours);
        }
        if hours > self.jam_on_hold {
            return Err(LedgerDomainError::HoldExceeded {
                layanan_id: self.id,
                requested: hours,
                held: self.jam_on_hold,
            });
        }
        self.jam_on_hold -= hours;
        self.updated_at = at;
        Ok(())
    }

    /// Consumes `hours` from both the hold and the spendable balance.
    ///
    /// Only held hours can burn; the status auto-transitions to
    /// [`LayananStatus::Depleted`] when balance and hold both reach zero.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::InvalidHours`] for a zero amount and
    /// [`LedgerDomainError::HoldExceeded`] when `hours` exceeds the current
    /// hold.
    pub fn burn(&mut self, hours: u64, at: DateTime<Utc>) -> Result<(), LedgerDomainError> {
        if hours == 0 {
            return Err(LedgerDomainError::InvalidHours);
        }
        if hours > self.jam_on_hold {
            return Err(LedgerDomainError::HoldExceeded {
                layanan_id: self.id,
                requested: hours,
                held: self.jam_on_hold,
            });
        }
        // jam_on_hold <= saldo_jam_efektif holds as an invariant, so the
        // balance subtraction cannot underflow.
        self.saldo_jam_efektif -= hours;
        self.jam_on_hold -= hours;
        if self.saldo_jam_efektif == 0 && self.jam_on_hold == 0 {
            self.status = LayananStatus::Depleted;
        }
        self.updated_at = at;
        Ok(())
    }

    /// Administratively pauses an active layanan.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::NotActive`] unless the layanan is
    /// currently active.
    pub fn mark_dormant(&mut self, at: DateTime<Utc>) -> Result<(), LedgerDomainError> {
        if self.status != LayananStatus::Active {
            return Err(LedgerDomainError::NotActive {
                layanan_id: self.id,
                status: self.status,
            });
        }
        self.status = LayananStatus::Dormant;
        self.updated_at = at;
        Ok(())
    }
}
