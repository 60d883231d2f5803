//! Shared handler state.

use std::sync::Arc;

use mockable::Clock;

use crate::project::{ports::ProjectRepository, services::ProjectCatalogService};
use crate::task::{
    ports::TaskRepository,
    services::{ProjectLocks, TaskSchedulingService},
};

/// Services reachable from every handler.
pub struct AppState<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Project catalog operations.
    pub projects: ProjectCatalogService<P, T, C>,
    /// Task scheduling operations.
    pub tasks: TaskSchedulingService<T, P, C>,
}

impl<P, T, C> Clone for AppState<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: self.projects.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

impl<P, T, C> AppState<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Wires both services over the same stores and one lock registry.
    #[must_use]
    pub fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        let locks = ProjectLocks::new();
        Self {
            projects: ProjectCatalogService::new(
                Arc::clone(&projects),
                Arc::clone(&tasks),
                Arc::clone(&clock),
            )
            .with_locks(locks.clone()),
            tasks: TaskSchedulingService::new(tasks, projects, clock).with_locks(locks),
        }
    }
}
