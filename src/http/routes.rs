//! Route table.

use axum::Router;
use axum::routing::{get, post, put};
use mockable::Clock;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;
use crate::project::ports::ProjectRepository;
use crate::task::ports::TaskRepository;

/// Body of `GET /`.
pub const LIVENESS_TEXT: &str = "tasklane is running";

/// Builds the API router over the given state.
///
/// Per-request spans come from [`TraceLayer`].
#[must_use]
pub fn router<P, T, C>(state: AppState<P, T, C>) -> Router
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(|| async { LIVENESS_TEXT }))
        .route(
            "/projects",
            post(handlers::create_project::<P, T, C>).get(handlers::list_projects::<P, T, C>),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project::<P, T, C>)
                .put(handlers::update_project::<P, T, C>)
                .delete(handlers::delete_project::<P, T, C>),
        )
        .route(
            "/projects/{project_id}/tasks",
            post(handlers::create_task::<P, T, C>).get(handlers::list_tasks::<P, T, C>),
        )
        .route(
            "/projects/{project_id}/completedtasks",
            get(handlers::list_completed_tasks::<P, T, C>),
        )
        .route(
            "/projects/{project_id}/uncompletedtasks",
            get(handlers::list_uncompleted_tasks::<P, T, C>),
        )
        .route(
            "/tasks/{id}",
            put(handlers::update_task::<P, T, C>).delete(handlers::delete_task::<P, T, C>),
        )
        .route(
            "/completedtasks/{id}",
            put(handlers::complete_task::<P, T, C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
