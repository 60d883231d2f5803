//! `PostgreSQL` connection pooling and schema bootstrap shared by the
//! project and task adapters.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by the persistence adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied at startup. Every statement is idempotent.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_projects_and_tasks/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("failed to obtain a PostgreSQL connection: {0}")]
    Pool(#[from] PoolError),

    /// Applying the schema failed.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PersistenceError::Pool`] when the pool cannot establish its
/// initial connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PersistenceError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(PersistenceError::from)
}

/// Creates the `projects` and `tasks` tables when they do not exist.
///
/// This is a blocking operation that should be called from `spawn_blocking`
/// or a synchronous context.
///
/// # Errors
///
/// Returns [`PersistenceError`] when no connection is available or a
/// statement fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), PersistenceError> {
    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA_SQL)?;
    Ok(())
}
