//! Repository port for layanan persistence and atomic balance operations.

use crate::ledger::domain::{Layanan, LayananId, LedgerDomainError};
use crate::registry::domain::Principal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for layanan repository operations.
pub type LayananRepositoryResult<T> = Result<T, LayananRepositoryError>;

/// Layanan persistence contract.
///
/// The balance mutations (`reserve_hours`, `release_hours`, `burn_hours`)
/// are repository operations rather than load-mutate-store sequences in the
/// service layer: the layanan balance is the only contended-write resource
/// in the system and each mutation must run as one atomic
/// check-then-update against the record.
#[async_trait]
pub trait LayananRepository: Send + Sync {
    /// Stores a newly activated layanan.
    ///
    /// # Errors
    ///
    /// Returns [`LayananRepositoryError::DuplicateLayanan`] when the ID
    /// already exists.
    async fn store(&self, layanan: &Layanan) -> LayananRepositoryResult<()>;

    /// Persists changes to an existing layanan (status, deadline, scope).
    ///
    /// # Errors
    ///
    /// Returns [`LayananRepositoryError::NotFound`] when the layanan does
    /// not exist.
    async fn update(&self, layanan: &Layanan) -> LayananRepositoryResult<()>;

    /// Finds a layanan by identifier.
    ///
    /// Returns `None` when the layanan does not exist.
    async fn find_by_id(&self, id: LayananId) -> LayananRepositoryResult<Option<Layanan>>;

    /// Returns the client's active layanan records, oldest first.
    async fn list_active_by_client(
        &self,
        client: &Principal,
    ) -> LayananRepositoryResult<Vec<Layanan>>;

    /// Atomically moves `hours` onto hold.
    ///
    /// # Errors
    ///
    /// Returns [`LayananRepositoryError::NotFound`] for unknown records and
    /// [`LayananRepositoryError::Domain`] carrying
    /// [`LedgerDomainError::InsufficientBalance`] (or the other balance
    /// rule violations) when the reservation cannot be taken.
    async fn reserve_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan>;

    /// Atomically returns `hours` from hold to the available pool.
    ///
    /// # Errors
    ///
    /// As for [`LayananRepository::reserve_hours`], with
    /// [`LedgerDomainError::HoldExceeded`] as the balance violation.
    async fn release_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan>;

    /// Atomically burns `hours` from both hold and spendable balance.
    ///
    /// # Errors
    ///
    /// As for [`LayananRepository::release_hours`].
    async fn burn_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan>;
}

/// Errors returned by layanan repository implementations.
#[derive(Debug, Clone, Error)]
pub enum LayananRepositoryError {
    /// A layanan with the same identifier already exists.
    #[error("duplicate layanan identifier: {0}")]
    DuplicateLayanan(LayananId),

    /// The layanan was not found.
    #[error("layanan not found: {0}")]
    NotFound(LayananId),

    /// A balance rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] LedgerDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LayananRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
