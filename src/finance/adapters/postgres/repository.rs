//! `PostgreSQL` repository implementation for finance storage.

use super::{
    models::{NewWithdrawRow, PartnerBalanceRow, SettlementRow, WithdrawRow},
    schema::{partner_balances, settlements, withdraws},
};
use crate::finance::{
    domain::{
        FinanceDomainError, FinancialResult, PersistedFinancialResult, PersistedWithdrawData,
        WithdrawId, WithdrawRequest, WithdrawResolution, WithdrawStatus,
    },
    ports::{FinanceRepository, FinanceRepositoryError, FinanceRepositoryResult},
};
use crate::registry::domain::Principal;
use crate::task::domain::{TaskId, TaskStatus};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by finance adapters.
pub type FinancePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed finance repository.
///
/// The debit runs as a single guarded `UPDATE` so two concurrent approvals
/// against the same partner cannot overdraw the balance.
#[derive(Debug, Clone)]
pub struct PostgresFinanceRepository {
    pool: FinancePgPool,
}

impl PostgresFinanceRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: FinancePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> FinanceRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> FinanceRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(FinanceRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(FinanceRepositoryError::persistence)?
    }
}

#[async_trait]
impl FinanceRepository for PostgresFinanceRepository {
    async fn record_settlement(&self, result: &FinancialResult) -> FinanceRepositoryResult<()> {
        let task_id = result.task_id();
        let new_row = to_settlement_row(result)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(settlements::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        FinanceRepositoryError::AlreadySettled(task_id)
                    }
                    _ => FinanceRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_settlement(
        &self,
        task_id: TaskId,
    ) -> FinanceRepositoryResult<Option<FinancialResult>> {
        self.run_blocking(move |connection| {
            let row = settlements::table
                .find(task_id.into_inner())
                .select(SettlementRow::as_select())
                .first::<SettlementRow>(connection)
                .optional()
                .map_err(FinanceRepositoryError::persistence)?;
            row.map(row_to_settlement).transpose()
        })
        .await
    }

    async fn credit_partner(
        &self,
        partner: &Principal,
        amount: u64,
    ) -> FinanceRepositoryResult<u64> {
        let partner_key = partner.as_str().to_owned();
        let amount_db = to_db_amount(amount)?;

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(partner_balances::table)
                .values(PartnerBalanceRow {
                    partner: partner_key,
                    saldo: amount_db,
                })
                .on_conflict(partner_balances::partner)
                .do_update()
                .set(
                    partner_balances::saldo
                        .eq(partner_balances::saldo + excluded(partner_balances::saldo)),
                )
                .returning(PartnerBalanceRow::as_returning())
                .get_result::<PartnerBalanceRow>(connection)
                .map_err(FinanceRepositoryError::persistence)?;
            from_db_amount(row.saldo)
        })
        .await
    }

    async fn debit_partner(
        &self,
        partner: &Principal,
        amount: u64,
    ) -> FinanceRepositoryResult<u64> {
        let partner_key = partner.as_str().to_owned();
        let partner_for_error = partner.clone();
        let amount_db = to_db_amount(amount)?;

        self.run_blocking(move |connection| {
            // Guarded single-statement debit: the balance check is part of
            // the UPDATE filter, so a concurrent debit cannot slip between
            // check and write.
            let updated = diesel::update(
                partner_balances::table
                    .filter(partner_balances::partner.eq(partner_key.clone()))
                    .filter(partner_balances::saldo.ge(amount_db)),
            )
            .set(partner_balances::saldo.eq(partner_balances::saldo - amount_db))
            .returning(PartnerBalanceRow::as_returning())
            .get_result::<PartnerBalanceRow>(connection)
            .optional()
            .map_err(FinanceRepositoryError::persistence)?;

            match updated {
                Some(row) => from_db_amount(row.saldo),
                None => {
                    let available = partner_balances::table
                        .filter(partner_balances::partner.eq(partner_key))
                        .select(partner_balances::saldo)
                        .first::<i64>(connection)
                        .optional()
                        .map_err(FinanceRepositoryError::persistence)?
                        .unwrap_or(0);
                    Err(FinanceDomainError::InsufficientFunds {
                        partner: partner_for_error,
                        requested: amount,
                        available: from_db_amount(available)?,
                    }
                    .into())
                }
            }
        })
        .await
    }

    async fn partner_balance(&self, partner: &Principal) -> FinanceRepositoryResult<u64> {
        let partner_key = partner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let saldo = partner_balances::table
                .filter(partner_balances::partner.eq(partner_key))
                .select(partner_balances::saldo)
                .first::<i64>(connection)
                .optional()
                .map_err(FinanceRepositoryError::persistence)?
                .unwrap_or(0);
            from_db_amount(saldo)
        })
        .await
    }

    async fn store_withdraw(&self, request: &WithdrawRequest) -> FinanceRepositoryResult<()> {
        let withdraw_id = request.id();
        let new_row = to_withdraw_row(request)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(withdraws::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        FinanceRepositoryError::DuplicateWithdraw(withdraw_id)
                    }
                    _ => FinanceRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_withdraw(&self, request: &WithdrawRequest) -> FinanceRepositoryResult<()> {
        let withdraw_id = request.id();
        let changes = to_withdraw_row(request)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(withdraws::table.find(withdraw_id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(FinanceRepositoryError::persistence)?;
            if updated == 0 {
                return Err(FinanceRepositoryError::WithdrawNotFound(withdraw_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_withdraw(
        &self,
        id: WithdrawId,
    ) -> FinanceRepositoryResult<Option<WithdrawRequest>> {
        self.run_blocking(move |connection| {
            let row = withdraws::table
                .find(id.into_inner())
                .select(WithdrawRow::as_select())
                .first::<WithdrawRow>(connection)
                .optional()
                .map_err(FinanceRepositoryError::persistence)?;
            row.map(row_to_withdraw).transpose()
        })
        .await
    }

    async fn list_withdraws_by_partner(
        &self,
        partner: &Principal,
    ) -> FinanceRepositoryResult<Vec<WithdrawRequest>> {
        let partner_key = partner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = withdraws::table
                .filter(withdraws::partner.eq(partner_key))
                .order(withdraws::requested_at.asc())
                .select(WithdrawRow::as_select())
                .load::<WithdrawRow>(connection)
                .map_err(FinanceRepositoryError::persistence)?;
            rows.into_iter().map(row_to_withdraw).collect()
        })
        .await
    }
}

fn to_settlement_row(result: &FinancialResult) -> FinanceRepositoryResult<SettlementRow> {
    Ok(SettlementRow {
        task_id: result.task_id().into_inner(),
        task_status: result.task_status().as_str().to_owned(),
        jam_dibakar: to_db_amount(result.jam_dibakar())?,
        nilai_tugas: to_db_amount(result.nilai_tugas())?,
        platform_fee: to_db_amount(result.platform_fee())?,
        partner_fee: to_db_amount(result.partner_fee())?,
        partner_referral_fee: to_db_amount(result.partner_referral_fee())?,
        jumlah_bayar: to_db_amount(result.jumlah_bayar())?,
        settled_at: result.settled_at(),
    })
}

fn row_to_settlement(row: SettlementRow) -> FinanceRepositoryResult<FinancialResult> {
    let SettlementRow {
        task_id,
        task_status: persisted_status,
        jam_dibakar,
        nilai_tugas,
        platform_fee,
        partner_fee,
        partner_referral_fee,
        jumlah_bayar,
        settled_at,
    } = row;

    let data = PersistedFinancialResult {
        task_id: TaskId::from_uuid(task_id),
        task_status: TaskStatus::try_from(persisted_status.as_str())
            .map_err(FinanceRepositoryError::persistence)?,
        jam_dibakar: from_db_amount(jam_dibakar)?,
        nilai_tugas: from_db_amount(nilai_tugas)?,
        platform_fee: from_db_amount(platform_fee)?,
        partner_fee: from_db_amount(partner_fee)?,
        partner_referral_fee: from_db_amount(partner_referral_fee)?,
        jumlah_bayar: from_db_amount(jumlah_bayar)?,
        settled_at,
    };
    Ok(FinancialResult::from_persisted(data))
}

fn to_withdraw_row(request: &WithdrawRequest) -> FinanceRepositoryResult<NewWithdrawRow> {
    Ok(NewWithdrawRow {
        id: request.id().into_inner(),
        partner: request.partner().as_str().to_owned(),
        amount: to_db_amount(request.amount())?,
        status: request.status().as_str().to_owned(),
        resolved_by: request
            .resolution()
            .map(|resolution| resolution.by.as_str().to_owned()),
        resolved_at: request.resolution().map(|resolution| resolution.at),
        requested_at: request.requested_at(),
    })
}

fn row_to_withdraw(row: WithdrawRow) -> FinanceRepositoryResult<WithdrawRequest> {
    let WithdrawRow {
        id,
        partner: persisted_partner,
        amount,
        status: persisted_status,
        resolved_by,
        resolved_at,
        requested_at,
    } = row;

    let resolution = match (resolved_by, resolved_at) {
        (Some(by), Some(at)) => Some(WithdrawResolution {
            by: Principal::new(by).map_err(FinanceRepositoryError::persistence)?,
            at,
        }),
        _ => None,
    };

    let data = PersistedWithdrawData {
        id: WithdrawId::from_uuid(id),
        partner: Principal::new(persisted_partner).map_err(FinanceRepositoryError::persistence)?,
        amount: from_db_amount(amount)?,
        status: WithdrawStatus::try_from(persisted_status.as_str())
            .map_err(FinanceRepositoryError::persistence)?,
        resolution,
        requested_at,
    };
    Ok(WithdrawRequest::from_persisted(data))
}

fn to_db_amount(value: u64) -> FinanceRepositoryResult<i64> {
    i64::try_from(value).map_err(FinanceRepositoryError::persistence)
}

fn from_db_amount(value: i64) -> FinanceRepositoryResult<u64> {
    u64::try_from(value).map_err(FinanceRepositoryError::persistence)
}
