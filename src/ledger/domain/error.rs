//! Error types for service ledger domain validation.

use super::ids::LayananId;
use super::layanan::LayananStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating ledger domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerDomainError {
    /// The unit count must be at least one.
    #[error("unit count {0} is invalid, at least 1 unit is required")]
    InvalidUnitCount(u64),

    /// The unit price must be positive.
    #[error("price per unit must be greater than zero")]
    InvalidPrice,

    /// An hour amount of zero was supplied to a balance operation.
    #[error("hour amount must be greater than zero")]
    InvalidHours,

    /// The available balance cannot cover the requested reservation.
    #[error(
        "layanan {layanan_id} has {available} effective hours available, {requested} requested"
    )]
    InsufficientBalance {
        /// Target layanan.
        layanan_id: LayananId,
        /// Hours requested.
        requested: u64,
        /// Hours available (balance minus hold).
        available: u64,
    },

    /// A release or burn exceeded the hours currently on hold.
    #[error("layanan {layanan_id} has {held} hours on hold, {requested} requested")]
    HoldExceeded {
        /// Target layanan.
        layanan_id: LayananId,
        /// Hours requested.
        requested: u64,
        /// Hours currently on hold.
        held: u64,
    },

    /// The layanan is not in a status that permits the operation.
    #[error("layanan {layanan_id} is {status} and cannot accept this operation")]
    NotActive {
        /// Target layanan.
        layanan_id: LayananId,
        /// Status the layanan held when the operation was attempted.
        status: LayananStatus,
    },
}

/// Error returned while parsing layanan statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown layanan status: {0}")]
pub struct ParseLayananStatusError(pub String);

/// Error returned while parsing layanan types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown layanan type: {0}")]
pub struct ParseJenisLayananError(pub String);

/// Error returned while parsing resource types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown resource type: {0}")]
pub struct ParseResourceTypeError(pub String);
