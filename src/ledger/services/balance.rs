//! Service layer for layanan activation and balance queries.

use crate::ledger::{
    domain::{
        JenisLayanan, Layanan, LayananActivation, LayananId, LedgerDomainError, ResourceType,
    },
    ports::{LayananRepository, LayananRepositoryError},
};
use crate::registry::domain::Principal;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for activating a layanan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateServiceRequest {
    client: Principal,
    asistenmu: Principal,
    jenis: JenisLayanan,
    units: u64,
    harga_per_unit: u64,
    resource_type: ResourceType,
    deadline: Option<DateTime<Utc>>,
    scope: Option<String>,
}

impl ActivateServiceRequest {
    /// Creates a request with the required purchase fields.
    #[must_use]
    pub const fn new(
        client: Principal,
        asistenmu: Principal,
        jenis: JenisLayanan,
        units: u64,
        harga_per_unit: u64,
    ) -> Self {
        Self {
            client,
            asistenmu,
            jenis,
            units,
            harga_per_unit,
            resource_type: ResourceType::Standard,
            deadline: None,
            scope: None,
        }
    }

    /// Sets the staffing model.
    #[must_use]
    pub const fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = resource_type;
        self
    }

    /// Sets the service deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the scope description.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Service-level errors for balance operations.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] LedgerDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] LayananRepositoryError),
}

/// Result type for balance service operations.
pub type BalanceResult<T> = Result<T, BalanceError>;

/// Layanan activation and query service.
#[derive(Clone)]
pub struct BalanceService<R, C>
where
    R: LayananRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BalanceService<R, C>
where
    R: LayananRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new balance service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Activates a new layanan for a client.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError`] when the purchase parameters are invalid or
    /// persistence fails.
    pub async fn activate_service(
        &self,
        request: ActivateServiceRequest,
    ) -> BalanceResult<Layanan> {
        let record = Layanan::activate(
            LayananActivation {
                client: request.client,
                asistenmu: request.asistenmu,
                jenis: request.jenis,
                resource_type: request.resource_type,
                units: request.units,
                harga_per_unit: request.harga_per_unit,
                deadline: request.deadline,
                scope: request.scope,
            },
            self.clock.utc(),
        )?;
        self.repository.store(&record).await?;
        info!(
            layanan_id = %record.id(),
            client = %record.client(),
            saldo_jam = record.saldo_jam_efektif(),
            "layanan activated"
        );
        Ok(record)
    }

    /// Returns the client's active layanan records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::Repository`] when the listing fails.
    pub async fn get_my_layanan_aktif(&self, client: &Principal) -> BalanceResult<Vec<Layanan>> {
        Ok(self.repository.list_active_by_client(client).await?)
    }

    /// Returns the client's primary (oldest active) layanan.
    ///
    /// Returns `Ok(None)` when the client has no active layanan.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::Repository`] when the lookup fails.
    pub async fn get_client_main_service(
        &self,
        client: &Principal,
    ) -> BalanceResult<Option<Layanan>> {
        let mut records = self.repository.list_active_by_client(client).await?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.remove(0)))
        }
    }

    /// Looks up a layanan by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: LayananId) -> BalanceResult<Option<Layanan>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Administratively pauses an active layanan.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError`] when the layanan is unknown or not active.
    pub async fn mark_dormant(&self, id: LayananId) -> BalanceResult<Layanan> {
        let mut record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(LayananRepositoryError::NotFound(id))?;
        record.mark_dormant(self.clock.utc())?;
        self.repository.update(&record).await?;
        info!(layanan_id = %record.id(), "layanan marked dormant");
        Ok(record)
    }
}
