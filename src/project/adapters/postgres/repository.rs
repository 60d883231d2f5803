//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::persistence::PgPool;
use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project);

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_details(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let name = project.name().to_owned();
        let description = project.description().to_owned();
        let updated_at = project.updated_at();

        self.run_blocking(move |connection| {
            let affected = diesel::update(projects::table.find(project_id.into_inner()))
                .set((
                    projects::name.eq(name),
                    projects::description.eq(description),
                    projects::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(row.map(row_to_project))
        })
        .await
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_project).collect())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(projects::table.find(id.into_inner()))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn attach_task(&self, id: ProjectId, task_id: TaskId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::sql_query(concat!(
                "UPDATE projects SET task_ids = array_append(task_ids, $2) ",
                "WHERE id = $1 AND NOT ($2 = ANY(task_ids))",
            ))
            .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
            .bind::<diesel::sql_types::Uuid, _>(task_id.into_inner())
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                ensure_project_exists(connection, id)?;
            }
            Ok(())
        })
        .await
    }

    async fn detach_task(
        &self,
        id: ProjectId,
        task_id: TaskId,
    ) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected = diesel::sql_query(concat!(
                "UPDATE projects SET task_ids = array_remove(task_ids, $2) ",
                "WHERE id = $1 AND $2 = ANY(task_ids)",
            ))
            .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
            .bind::<diesel::sql_types::Uuid, _>(task_id.into_inner())
            .execute(connection)
            .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                ensure_project_exists(connection, id)?;
                return Ok(false);
            }
            Ok(true)
        })
        .await
    }
}

fn ensure_project_exists(
    connection: &mut PgConnection,
    id: ProjectId,
) -> ProjectRepositoryResult<()> {
    let exists = diesel::select(diesel::dsl::exists(
        projects::table.filter(projects::id.eq(id.into_inner())),
    ))
    .get_result::<bool>(connection)
    .map_err(ProjectRepositoryError::persistence)?;
    if exists {
        Ok(())
    } else {
        Err(ProjectRepositoryError::NotFound(id))
    }
}

fn to_new_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().to_owned(),
        description: project.description().to_owned(),
        task_ids: project
            .task_ids()
            .iter()
            .copied()
            .map(TaskId::into_inner)
            .collect(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        task_ids: row.task_ids.into_iter().map(TaskId::from_uuid).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
