//! Tasklane HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # In-memory storage on the default address 0.0.0.0:3000
//! tasklane
//!
//! # PostgreSQL storage on a custom address
//! tasklane --bind 127.0.0.1:8080 --storage postgres \
//!     --database-url postgres://localhost/tasklane
//!
//! # Or via environment variables
//! TASKLANE_ADDR=127.0.0.1:8080 DATABASE_URL=postgres://localhost/tasklane tasklane
//! ```

use std::sync::Arc;

use axum::Router;
use clap::Parser;
use mockable::DefaultClock;
use tasklane::config::{CliArgs, ServerConfig, StorageBackend};
use tasklane::http::{self, AppState};
use tasklane::persistence::{self, PersistenceError};
use tasklane::project::adapters::{
    memory::InMemoryProjectRepository, postgres::PostgresProjectRepository,
};
use tasklane::task::adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = CliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = ServerConfig::load(&cli)?;

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        addr = %config.bind_addr,
        storage = ?config.storage,
        "starting tasklane server"
    );

    let app = build_router(&config).await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to prepare storage");
    })?;
    let (bound_addr, handle) = http::serve(&config.bind_addr, app).await?;
    tracing::info!(addr = %bound_addr, "tasklane listening");

    if let Err(e) = handle.await {
        tracing::error!(error = %e, "http server task failed");
        return Err(e.into());
    }
    Ok(())
}

async fn build_router(config: &ServerConfig) -> Result<Router, BoxError> {
    let clock = Arc::new(DefaultClock);
    match config.storage {
        StorageBackend::Memory => Ok(http::router(AppState::new(
            Arc::new(InMemoryProjectRepository::new()),
            Arc::new(InMemoryTaskRepository::new()),
            clock,
        ))),
        StorageBackend::Postgres => {
            let database_url = config.require_database_url()?.to_owned();
            let pool_size = config.pool_size;
            let pool = tokio::task::spawn_blocking(move || {
                let ready = persistence::build_pool(&database_url, pool_size)?;
                persistence::apply_schema(&ready)?;
                Ok::<_, PersistenceError>(ready)
            })
            .await??;
            tracing::info!(pool_size, "postgres schema ready");

            Ok(http::router(AppState::new(
                Arc::new(PostgresProjectRepository::new(pool.clone())),
                Arc::new(PostgresTaskRepository::new(pool)),
                clock,
            )))
        }
    }
}
