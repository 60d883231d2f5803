//! Service layer for project creation, lookup, editing, and removal.

use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    ports::{TaskRepository, TaskRepositoryError},
    services::ProjectLocks,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating or editing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetailsRequest {
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
}

impl ProjectDetailsRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectCatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    NotFound(ProjectId),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Task repository operation failed while removing a project's tasks.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
}

/// Result type for project catalog operations.
pub type ProjectCatalogResult<T> = Result<T, ProjectCatalogError>;

/// Project catalog orchestration service.
pub struct ProjectCatalogService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
    locks: ProjectLocks,
}

impl<P, T, C> Clone for ProjectCatalogService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            projects: Arc::clone(&self.projects),
            tasks: Arc::clone(&self.tasks),
            clock: Arc::clone(&self.clock),
            locks: self.locks.clone(),
        }
    }
}

impl<P, T, C> ProjectCatalogService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service with its own lock registry.
    #[must_use]
    pub fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            clock,
            locks: ProjectLocks::new(),
        }
    }

    /// Replaces the lock registry. Share the registry of the scheduling
    /// service so deletion never interleaves with a task write.
    #[must_use]
    pub fn with_locks(mut self, locks: ProjectLocks) -> Self {
        self.locks = locks;
        self
    }

    async fn find_project_or_error(&self, id: ProjectId) -> ProjectCatalogResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectCatalogError::NotFound(id))
    }

    /// Creates a project with an empty task list.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Domain`] for a blank name or
    /// description, or repository errors.
    pub async fn create_project(
        &self,
        request: ProjectDetailsRequest,
    ) -> ProjectCatalogResult<Project> {
        let project = Project::new(request.name, request.description, &*self.clock)?;
        self.projects.store(&project).await?;
        tracing::info!(project_id = %project.id(), "project created");
        Ok(project)
    }

    /// Lists all projects.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_projects(&self) -> ProjectCatalogResult<Vec<Project>> {
        Ok(self.projects.list_all().await?)
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn find_project(&self, id: ProjectId) -> ProjectCatalogResult<Option<Project>> {
        Ok(self.projects.find_by_id(id).await?)
    }

    /// Replaces a project's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::NotFound`], domain errors, or
    /// repository errors.
    pub async fn update_project(
        &self,
        id: ProjectId,
        request: ProjectDetailsRequest,
    ) -> ProjectCatalogResult<Project> {
        let mut project = self.find_project_or_error(id).await?;
        project.update_details(request.name, request.description, &*self.clock)?;
        self.projects
            .update_details(&project)
            .await
            .map_err(|err| match err {
                ProjectRepositoryError::NotFound(missing) => ProjectCatalogError::NotFound(missing),
                other => other.into(),
            })?;
        tracing::info!(project_id = %id, "project updated");
        Ok(project)
    }

    /// Deletes a project together with its tasks and returns the removed
    /// project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::NotFound`] or repository errors.
    pub async fn delete_project(&self, id: ProjectId) -> ProjectCatalogResult<Project> {
        let project = self.find_project_or_error(id).await?;
        let guard = self.locks.acquire(id).await;

        let removed_tasks = self.tasks.delete_for_project(id).await?;
        self.projects.delete(id).await.map_err(|err| match err {
            ProjectRepositoryError::NotFound(missing) => ProjectCatalogError::NotFound(missing),
            other => other.into(),
        })?;
        drop(guard);
        self.locks.forget(id);

        tracing::info!(project_id = %id, removed_tasks, "project deleted");
        Ok(project)
    }
}
