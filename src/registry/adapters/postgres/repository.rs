//! `PostgreSQL` repository implementation for user registry storage.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::registry::{
    domain::{
        ApprovalDecision, PersistedUserData, Principal, Role, User, UserProfile, UserStatus,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by registry adapters.
pub type RegistryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: RegistryPgPool,
}

/// Transaction-local error distinguishing business outcomes from database
/// failures so the claim transaction can roll back on either.
#[derive(Debug, Error)]
enum TxError {
    #[error(transparent)]
    Business(UserRepositoryError),
    #[error(transparent)]
    Db(#[from] DieselError),
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: RegistryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let principal = user.principal().clone();
        let new_row = to_new_row(user)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        UserRepositoryError::DuplicatePrincipal(principal.clone())
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let principal = user.principal().clone();
        let changes = to_new_row(user)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.find(principal.as_str().to_owned()))
                .set(&changes)
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(principal.clone()));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_principal(&self, principal: &Principal) -> UserRepositoryResult<Option<User>> {
        let key = principal.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .find(key)
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_by_status(&self, status: UserStatus) -> UserRepositoryResult<Vec<User>> {
        let status_key = status.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::status.eq(status_key))
                .order(users::created_at.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .order(users::created_at.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn claim_superadmin(&self, candidate: &User) -> UserRepositoryResult<User> {
        let claim_candidate = candidate.clone();
        self.run_blocking(move |connection| {
            let outcome = connection.transaction::<User, TxError, _>(|connection| {
                // The existence check and the write run in one transaction;
                // a unique partial index on role='superadmin' closes the
                // remaining serialization window at the schema level.
                let existing_superadmins: i64 = users::table
                    .filter(users::role.eq(Role::Superadmin.as_str()))
                    .count()
                    .get_result(connection)?;
                if existing_superadmins > 0 {
                    return Err(TxError::Business(
                        UserRepositoryError::SuperadminAlreadyClaimed,
                    ));
                }

                let key = claim_candidate.principal().as_str().to_owned();
                let stored = users::table
                    .find(key)
                    .select(UserRow::as_select())
                    .first::<UserRow>(connection)
                    .optional()?;

                let claimed = match stored {
                    Some(row) => {
                        let mut user = row_to_user(row).map_err(TxError::Business)?;
                        user.promote_to_superadmin(claim_candidate.updated_at());
                        let changes = to_new_row(&user).map_err(TxError::Business)?;
                        diesel::update(
                            users::table.find(user.principal().as_str().to_owned()),
                        )
                        .set(&changes)
                        .execute(connection)?;
                        user
                    }
                    None => {
                        let new_row = to_new_row(&claim_candidate).map_err(TxError::Business)?;
                        diesel::insert_into(users::table)
                            .values(&new_row)
                            .execute(connection)?;
                        claim_candidate.clone()
                    }
                };
                Ok(claimed)
            });

            outcome.map_err(|err| match err {
                TxError::Business(business) => business,
                TxError::Db(db) => UserRepositoryError::persistence(db),
            })
        })
        .await
    }
}

fn to_new_row(user: &User) -> UserRepositoryResult<NewUserRow> {
    let decision = user
        .decision()
        .map(serde_json::to_value)
        .transpose()
        .map_err(UserRepositoryError::persistence)?;

    Ok(NewUserRow {
        principal: user.principal().as_str().to_owned(),
        name: user.profile().name().to_owned(),
        email: user.profile().email().map(str::to_owned),
        phone: user.profile().phone().map(str::to_owned),
        company: user.profile().company().map(str::to_owned),
        kota: user.profile().kota().map(str::to_owned),
        role: user.role().as_str().to_owned(),
        status: user.status().as_str().to_owned(),
        decision,
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    })
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        principal: persisted_principal,
        name,
        email,
        phone,
        company,
        kota,
        role: persisted_role,
        status: persisted_status,
        decision: persisted_decision,
        created_at,
        updated_at,
    } = row;

    let principal = Principal::new(persisted_principal).map_err(UserRepositoryError::persistence)?;
    let mut profile = UserProfile::new(name).map_err(UserRepositoryError::persistence)?;
    if let Some(email) = email {
        profile = profile.with_email(email);
    }
    if let Some(phone) = phone {
        profile = profile.with_phone(phone);
    }
    if let Some(company) = company {
        profile = profile.with_company(company);
    }
    if let Some(kota) = kota {
        profile = profile.with_kota(kota);
    }
    let role =
        Role::try_from(persisted_role.as_str()).map_err(UserRepositoryError::persistence)?;
    let status = UserStatus::try_from(persisted_status.as_str())
        .map_err(UserRepositoryError::persistence)?;
    let decision = persisted_decision
        .map(serde_json::from_value::<ApprovalDecision>)
        .transpose()
        .map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        principal,
        profile,
        role,
        status,
        decision,
        created_at,
        updated_at,
    }))
}
