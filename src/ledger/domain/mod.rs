//! Domain model for the service balance ledger.
//!
//! A layanan is a client's purchased service package. Its effective-hour
//! balance is the spendable resource the task lifecycle reserves against,
//! burns at completion and releases on cancellation paths.

mod error;
mod ids;
mod layanan;

pub use error::{
    LedgerDomainError, ParseJenisLayananError, ParseLayananStatusError, ParseResourceTypeError,
};
pub use ids::LayananId;
pub use layanan::{
    HOURS_PER_UNIT, JenisLayanan, Layanan, LayananActivation, LayananStatus,
    PersistedLayananData, ResourceType,
};
