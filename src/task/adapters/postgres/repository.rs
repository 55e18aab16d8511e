//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::ledger::domain::LayananId;
use crate::registry::domain::Principal;
use crate::task::{
    domain::{InternalData, PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changes = to_new_row(task)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_client(&self, client: &Principal) -> TaskRepositoryResult<Vec<Task>> {
        let client_key = client.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::client.eq(client_key))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let internal_data = task
        .internal_data()
        .map(serde_json::to_value)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let estimasi_jam = task
        .estimasi_jam()
        .map(i64::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        client: task.client().as_str().to_owned(),
        layanan_id: task.layanan_id().into_inner(),
        judul: task.judul().to_owned(),
        detail_permintaan: task.detail_permintaan().to_owned(),
        status: task.status().as_str().to_owned(),
        estimasi_jam,
        estimasi_disetujui: task.estimasi_disetujui(),
        jam_reserved: i64::try_from(task.jam_reserved())
            .map_err(TaskRepositoryError::persistence)?,
        internal_data,
        link_drive_client: task.link_drive_client().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        client: persisted_client,
        layanan_id,
        judul,
        detail_permintaan,
        status: persisted_status,
        estimasi_jam,
        estimasi_disetujui,
        jam_reserved,
        internal_data: persisted_internal_data,
        link_drive_client,
        created_at,
        updated_at,
    } = row;

    let internal_data = persisted_internal_data
        .map(serde_json::from_value::<InternalData>)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        client: Principal::new(persisted_client).map_err(TaskRepositoryError::persistence)?,
        layanan_id: LayananId::from_uuid(layanan_id),
        judul,
        detail_permintaan,
        status: TaskStatus::try_from(persisted_status.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        estimasi_jam: estimasi_jam
            .map(u64::try_from)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        estimasi_disetujui,
        jam_reserved: u64::try_from(jam_reserved).map_err(TaskRepositoryError::persistence)?,
        internal_data,
        link_drive_client,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
