//! In-memory repository for layanan ledger tests and single-process use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ledger::{
    domain::{Layanan, LayananId, LayananStatus, LedgerDomainError},
    ports::{LayananRepository, LayananRepositoryError, LayananRepositoryResult},
};
use crate::registry::domain::Principal;

/// Thread-safe in-memory layanan repository.
///
/// Balance mutations run the domain rules inside the write-lock section,
/// so two concurrent reservations against the same record serialize and at
/// most one can take the last available hours.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLayananRepository {
    state: Arc<RwLock<InMemoryLayananState>>,
}

#[derive(Debug, Default)]
struct InMemoryLayananState {
    records: HashMap<LayananId, Layanan>,
}

impl InMemoryLayananRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate_balance<F>(
        &self,
        id: LayananId,
        apply: F,
    ) -> LayananRepositoryResult<Layanan>
    where
        F: FnOnce(&mut Layanan) -> Result<(), LedgerDomainError>,
    {
        let mut state = self.state.write().map_err(|err| {
            LayananRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(LayananRepositoryError::NotFound(id))?;
        apply(record)?;
        Ok(record.clone())
    }
}

#[async_trait]
impl LayananRepository for InMemoryLayananRepository {
    async fn store(&self, layanan: &Layanan) -> LayananRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            LayananRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.records.contains_key(&layanan.id()) {
            return Err(LayananRepositoryError::DuplicateLayanan(layanan.id()));
        }
        state.records.insert(layanan.id(), layanan.clone());
        Ok(())
    }

    async fn update(&self, layanan: &Layanan) -> LayananRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            LayananRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.records.contains_key(&layanan.id()) {
            return Err(LayananRepositoryError::NotFound(layanan.id()));
        }
        state.records.insert(layanan.id(), layanan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: LayananId) -> LayananRepositoryResult<Option<Layanan>> {
        let state = self.state.read().map_err(|err| {
            LayananRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.records.get(&id).cloned())
    }

    async fn list_active_by_client(
        &self,
        client: &Principal,
    ) -> LayananRepositoryResult<Vec<Layanan>> {
        let state = self.state.read().map_err(|err| {
            LayananRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut records: Vec<Layanan> = state
            .records
            .values()
            .filter(|layanan| {
                layanan.client() == client && layanan.status() == LayananStatus::Active
            })
            .cloned()
            .collect();
        records.sort_by_key(Layanan::created_at);
        Ok(records)
    }

    async fn reserve_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan> {
        self.mutate_balance(id, |record| record.reserve(hours, at))
    }

    async fn release_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan> {
        self.mutate_balance(id, |record| record.release(hours, at))
    }

    async fn burn_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan> {
        self.mutate_balance(id, |record| record.burn(hours, at))
    }
}
