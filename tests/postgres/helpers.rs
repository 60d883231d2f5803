//! Shared helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{TemporaryDatabase, TestCluster};
use tasklane::http::AppState;
use tasklane::persistence::{PgPool, SCHEMA_SQL, build_pool};
use tasklane::project::{
    adapters::postgres::PostgresProjectRepository, domain::ProjectId,
    services::ProjectDetailsRequest,
};
use tasklane::task::adapters::postgres::PostgresTaskRepository;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "tasklane_test_template";

/// Both services wired over `PostgreSQL` repositories.
pub type PgServices = AppState<PostgresProjectRepository, PostgresTaskRepository, DefaultClock>;

/// Services, repositories, and pool over one temporary database.
///
/// Fields drop in declaration order, so pooled connections are closed
/// before the database is dropped.
pub struct PgContext {
    /// Services sharing one lock registry.
    pub services: PgServices,
    /// Project repository over the same pool.
    pub projects: Arc<PostgresProjectRepository>,
    /// Task repository over the same pool.
    pub tasks: Arc<PostgresTaskRepository>,
    /// Pool for raw SQL checks.
    pub pool: PgPool,
    _database: TemporaryDatabase,
}

/// Builds a runtime for driving the async repositories from sync tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn runtime() -> eyre::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster.ensure_template_exists(TEMPLATE_DB, |db_name| {
        let url = cluster.connection().database_url(db_name);
        let mut connection = PgConnection::establish(&url).map_err(|err| eyre::eyre!("{err}"))?;
        connection
            .batch_execute(SCHEMA_SQL)
            .map_err(|err| eyre::eyre!("{err}"))?;
        Ok(())
    })?;
    Ok(())
}

/// Creates a temporary database from the template and wires services over it.
///
/// # Errors
///
/// Returns an error if template setup, database creation, or pool
/// construction fails.
pub fn prepare(cluster: &TestCluster, pool_size: u32) -> eyre::Result<PgContext> {
    ensure_template(cluster)?;
    let name = format!("tasklane_{}", Uuid::new_v4().simple());
    let database = cluster.temporary_database_from_template(name, TEMPLATE_DB)?;
    let pool = build_pool(database.url(), pool_size)?;
    let projects = Arc::new(PostgresProjectRepository::new(pool.clone()));
    let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let services = AppState::new(
        Arc::clone(&projects),
        Arc::clone(&tasks),
        Arc::new(DefaultClock),
    );
    Ok(PgContext {
        services,
        projects,
        tasks,
        pool,
        _database: database,
    })
}

/// Returns 2026-07-06 at `hour:minute` UTC.
///
/// # Errors
///
/// Returns an error if the components do not name a valid instant.
pub fn at(hour: u32, minute: u32) -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2026, 7, 6, hour, minute, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid fixture instant {hour}:{minute}"))
}

/// Returns `hour:minute` plus `nanos` nanoseconds.
///
/// # Errors
///
/// Returns an error if the components do not name a valid instant.
pub fn at_nanos(hour: u32, minute: u32, nanos: i64) -> eyre::Result<DateTime<Utc>> {
    Ok(at(hour, minute)? + Duration::nanoseconds(nanos))
}

/// Creates a project and returns its identifier.
///
/// # Errors
///
/// Returns an error if the project cannot be created.
pub async fn create_project(services: &PgServices, name: &str) -> eyre::Result<ProjectId> {
    let project = services
        .projects
        .create_project(ProjectDetailsRequest::new(name, format!("{name} work")))
        .await?;
    Ok(project.id())
}
