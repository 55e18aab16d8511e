//! `PostgreSQL` repository implementation for layanan ledger storage.

use super::{
    models::{LayananRow, NewLayananRow},
    schema::layanan,
};
use crate::ledger::{
    domain::{
        JenisLayanan, Layanan, LayananId, LayananStatus, LedgerDomainError,
        PersistedLayananData, ResourceType,
    },
    ports::{LayananRepository, LayananRepositoryError, LayananRepositoryResult},
};
use crate::registry::domain::Principal;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by ledger adapters.
pub type LedgerPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed layanan repository.
///
/// Balance mutations lock the target row (`SELECT ... FOR UPDATE`) and run
/// the domain rules inside one transaction, so concurrent reservations
/// against the same layanan serialize exactly as in the in-memory adapter.
#[derive(Debug, Clone)]
pub struct PostgresLayananRepository {
    pool: LedgerPgPool,
}

/// Transaction-local error distinguishing business outcomes from database
/// failures.
#[derive(Debug, Error)]
enum TxError {
    #[error(transparent)]
    Business(LayananRepositoryError),
    #[error(transparent)]
    Db(#[from] DieselError),
}

impl PostgresLayananRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LedgerPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> LayananRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LayananRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(LayananRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(LayananRepositoryError::persistence)?
    }

    async fn mutate_balance<F>(
        &self,
        id: LayananId,
        apply: F,
    ) -> LayananRepositoryResult<Layanan>
    where
        F: FnOnce(&mut Layanan) -> Result<(), LedgerDomainError> + Send + 'static,
    {
        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<Layanan, TxError, _>(|connection| {
                let row = layanan::table
                    .find(id.into_inner())
                    .select(LayananRow::as_select())
                    .for_update()
                    .first::<LayananRow>(connection)
                    .optional()?
                    .ok_or(TxError::Business(LayananRepositoryError::NotFound(id)))?;

                let mut record = row_to_layanan(row).map_err(TxError::Business)?;
                apply(&mut record)
                    .map_err(|err| TxError::Business(LayananRepositoryError::Domain(err)))?;

                let changes = to_new_row(&record).map_err(TxError::Business)?;
                diesel::update(layanan::table.find(record.id().into_inner()))
                    .set(&changes)
                    .execute(connection)?;
                Ok(record)
            });

            outcome.map_err(|err| match err {
                TxError::Business(business) => business,
                TxError::Db(db) => LayananRepositoryError::persistence(db),
            })
        })
        .await
    }
}

#[async_trait]
impl LayananRepository for PostgresLayananRepository {
    async fn store(&self, record: &Layanan) -> LayananRepositoryResult<()> {
        let layanan_id = record.id();
        let new_row = to_new_row(record)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(layanan::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        LayananRepositoryError::DuplicateLayanan(layanan_id)
                    }
                    _ => LayananRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, record: &Layanan) -> LayananRepositoryResult<()> {
        let layanan_id = record.id();
        let changes = to_new_row(record)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(layanan::table.find(layanan_id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(LayananRepositoryError::persistence)?;
            if updated == 0 {
                return Err(LayananRepositoryError::NotFound(layanan_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: LayananId) -> LayananRepositoryResult<Option<Layanan>> {
        self.run_blocking(move |connection| {
            let row = layanan::table
                .find(id.into_inner())
                .select(LayananRow::as_select())
                .first::<LayananRow>(connection)
                .optional()
                .map_err(LayananRepositoryError::persistence)?;
            row.map(row_to_layanan).transpose()
        })
        .await
    }

    async fn list_active_by_client(
        &self,
        client: &Principal,
    ) -> LayananRepositoryResult<Vec<Layanan>> {
        let client_key = client.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = layanan::table
                .filter(layanan::client.eq(client_key))
                .filter(layanan::status.eq(LayananStatus::Active.as_str()))
                .order(layanan::created_at.asc())
                .select(LayananRow::as_select())
                .load::<LayananRow>(connection)
                .map_err(LayananRepositoryError::persistence)?;
            rows.into_iter().map(row_to_layanan).collect()
        })
        .await
    }

    async fn reserve_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan> {
        self.mutate_balance(id, move |record| record.reserve(hours, at))
            .await
    }

    async fn release_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan> {
        self.mutate_balance(id, move |record| record.release(hours, at))
            .await
    }

    async fn burn_hours(
        &self,
        id: LayananId,
        hours: u64,
        at: DateTime<Utc>,
    ) -> LayananRepositoryResult<Layanan> {
        self.mutate_balance(id, move |record| record.burn(hours, at))
            .await
    }
}

fn to_new_row(record: &Layanan) -> LayananRepositoryResult<NewLayananRow> {
    Ok(NewLayananRow {
        id: record.id().into_inner(),
        client: record.client().as_str().to_owned(),
        asistenmu: record.asistenmu().as_str().to_owned(),
        jenis: record.jenis().as_str().to_owned(),
        resource_type: record.resource_type().as_str().to_owned(),
        status: record.status().as_str().to_owned(),
        harga_per_unit: to_db_amount(record.harga_per_unit())?,
        tarif_per_jam: to_db_amount(record.tarif_per_jam())?,
        saldo_original: to_db_amount(record.saldo_original())?,
        saldo_jam_efektif: to_db_amount(record.saldo_jam_efektif())?,
        jam_on_hold: to_db_amount(record.jam_on_hold())?,
        deadline: record.deadline(),
        scope: record.scope().map(str::to_owned),
        created_at: record.created_at(),
        updated_at: record.updated_at(),
    })
}

fn row_to_layanan(row: LayananRow) -> LayananRepositoryResult<Layanan> {
    let LayananRow {
        id,
        client: persisted_client,
        asistenmu: persisted_asistenmu,
        jenis: persisted_jenis,
        resource_type: persisted_resource_type,
        status: persisted_status,
        harga_per_unit,
        tarif_per_jam,
        saldo_original,
        saldo_jam_efektif,
        jam_on_hold,
        deadline,
        scope,
        created_at,
        updated_at,
    } = row;

    let data = PersistedLayananData {
        id: LayananId::from_uuid(id),
        client: Principal::new(persisted_client).map_err(LayananRepositoryError::persistence)?,
        asistenmu: Principal::new(persisted_asistenmu)
            .map_err(LayananRepositoryError::persistence)?,
        jenis: JenisLayanan::try_from(persisted_jenis.as_str())
            .map_err(LayananRepositoryError::persistence)?,
        resource_type: ResourceType::try_from(persisted_resource_type.as_str())
            .map_err(LayananRepositoryError::persistence)?,
        status: LayananStatus::try_from(persisted_status.as_str())
            .map_err(LayananRepositoryError::persistence)?,
        harga_per_unit: from_db_amount(harga_per_unit)?,
        tarif_per_jam: from_db_amount(tarif_per_jam)?,
        saldo_original: from_db_amount(saldo_original)?,
        saldo_jam_efektif: from_db_amount(saldo_jam_efektif)?,
        jam_on_hold: from_db_amount(jam_on_hold)?,
        deadline,
        scope,
        created_at,
        updated_at,
    };
    Ok(Layanan::from_persisted(data))
}

fn to_db_amount(value: u64) -> LayananRepositoryResult<i64> {
    i64::try_from(value).map_err(LayananRepositoryError::persistence)
}

fn from_db_amount(value: i64) -> LayananRepositoryResult<u64> {
    u64::try_from(value).map_err(LayananRepositoryError::persistence)
}
