//! HTTP request boundary.
//!
//! Translates JSON requests into service calls and service error kinds into
//! status codes. Successful responses are wrapped in a `{message, data}`
//! envelope.

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use dto::{
    ConflictResponse, Envelope, ErrorBody, ProjectPayload, ProjectResponse, TaskPayload,
    TaskResponse, parse_instant,
};
pub use error::ApiError;
pub use routes::{LIVENESS_TEXT, router};
pub use state::AppState;

use axum::Router;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// Binds `addr` and serves `app` on a background task.
///
/// Returns the bound address, which differs from `addr` when port 0 is
/// requested, and the handle of the serving task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn serve(
    addr: &str,
    app: Router,
) -> Result<(SocketAddr, JoinHandle<()>), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "http server error");
        }
    });

    Ok((bound_addr, handle))
}
