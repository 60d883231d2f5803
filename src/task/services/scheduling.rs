//! Service layer for conflict-checked task scheduling.

use super::locks::{ProjectGuard, ProjectLocks};
use crate::project::{
    domain::ProjectId,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{ScheduleConflict, Task, TaskDomainError, TaskId, TaskInterval, find_conflicts},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for scheduling a new task into a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields and an empty description.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            start,
            end,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Request payload for revising an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: String,
    description: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl UpdateTaskRequest {
    /// Creates a request with the required fields and an empty description.
    #[must_use]
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start,
            end,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Selects tasks of a project by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Completed tasks only.
    Completed,
    /// Tasks not yet completed.
    Incomplete,
}

impl TaskFilter {
    /// Returns whether the task passes this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.is_completed(),
            Self::Incomplete => !task.is_completed(),
        }
    }
}

/// Service-level errors for task scheduling operations.
#[derive(Debug, Error)]
pub enum TaskSchedulingError {
    /// Domain validation failed, including an interval with `start >= end`.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The proposed window overlaps other tasks of the project.
    #[error(transparent)]
    Conflict(#[from] ScheduleConflict),
    /// The owning project does not exist.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// The task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),
}

/// Result type for task scheduling operations.
pub type TaskSchedulingResult<T> = Result<T, TaskSchedulingError>;

/// Task scheduling orchestration service.
///
/// Every write re-reads the project's tasks while holding the project's lock,
/// validates the candidate window against them, and only then persists.
pub struct TaskSchedulingService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    clock: Arc<C>,
    locks: ProjectLocks,
}

impl<T, P, C> Clone for TaskSchedulingService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            projects: Arc::clone(&self.projects),
            clock: Arc::clone(&self.clock),
            locks: self.locks.clone(),
        }
    }
}

impl<T, P, C> TaskSchedulingService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new scheduling service with its own lock registry.
    #[must_use]
    pub fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            clock,
            locks: ProjectLocks::new(),
        }
    }

    /// Replaces the lock registry, so that other services writing to the
    /// same projects serialize with this one.
    #[must_use]
    pub fn with_locks(mut self, locks: ProjectLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Checks a new task's window against every task of the project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Conflict`] with the complete conflict
    /// list, or repository errors.
    pub async fn validate_new_task(
        &self,
        project_id: ProjectId,
        interval: &TaskInterval,
    ) -> TaskSchedulingResult<()> {
        let existing = self.tasks.list_for_project(project_id).await?;
        reject_conflicts(find_conflicts(interval, &existing, None))
    }

    /// Checks a revised window for `task_id` against the other tasks of the
    /// project. The task's own stored window is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Conflict`] with the complete conflict
    /// list, or repository errors.
    pub async fn validate_task_update(
        &self,
        task_id: TaskId,
        project_id: ProjectId,
        interval: &TaskInterval,
    ) -> TaskSchedulingResult<()> {
        let existing = self.tasks.list_for_project(project_id).await?;
        reject_conflicts(find_conflicts(interval, &existing, Some(task_id)))
    }

    /// Schedules a new task and appends it to its project's task list.
    ///
    /// The window is validated before any store access.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Domain`] for an unordered window or an
    /// empty title, [`TaskSchedulingError::ProjectNotFound`],
    /// [`TaskSchedulingError::Conflict`], or repository errors.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskSchedulingResult<Task> {
        let interval = TaskInterval::new(request.start, request.end)?;
        let project_id = request.project_id;
        let task = Task::new(
            project_id,
            request.title,
            request.description,
            interval,
            &*self.clock,
        )?;

        self.ensure_project_exists(project_id).await?;
        let _guard = self.locks.acquire(project_id).await;
        // The project may have been deleted while this call waited for the lock.
        self.ensure_project_exists(project_id).await?;
        self.validate_new_task(project_id, &interval)
            .await
            .inspect_err(|err| log_rejection(project_id, None, err))?;

        self.tasks.store(&task).await.map_err(|err| match err {
            TaskRepositoryError::ProjectMissing(id) => TaskSchedulingError::ProjectNotFound(id),
            other => other.into(),
        })?;
        if let Err(err) = self.projects.attach_task(project_id, task.id()).await {
            self.discard_orphan(&task).await;
            return Err(match err {
                ProjectRepositoryError::NotFound(id) => TaskSchedulingError::ProjectNotFound(id),
                other => other.into(),
            });
        }

        tracing::info!(
            project_id = %project_id,
            task_id = %task.id(),
            window = %interval,
            "task scheduled"
        );
        Ok(task)
    }

    /// Revises a task's title, description, and window.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::Domain`] for an unordered window or an
    /// empty title, [`TaskSchedulingError::TaskNotFound`],
    /// [`TaskSchedulingError::Conflict`], or repository errors.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskSchedulingResult<Task> {
        let interval = TaskInterval::new(request.start, request.end)?;
        let (mut task, _guard) = self.lock_task(task_id).await?;
        let project_id = task.project_id();

        task.revise(request.title, request.description, interval, &*self.clock)?;
        self.validate_task_update(task_id, project_id, &interval)
            .await
            .inspect_err(|err| log_rejection(project_id, Some(task_id), err))?;
        self.tasks.update(&task).await?;

        tracing::info!(
            project_id = %project_id,
            task_id = %task_id,
            window = %interval,
            "task rescheduled"
        );
        Ok(task)
    }

    /// Marks a task as completed. Completing a completed task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::TaskNotFound`] or repository errors.
    pub async fn complete_task(&self, task_id: TaskId) -> TaskSchedulingResult<Task> {
        let (mut task, _guard) = self.lock_task(task_id).await?;
        if task.complete(&*self.clock) {
            self.tasks.update(&task).await?;
            tracing::info!(task_id = %task_id, "task completed");
        }
        Ok(task)
    }

    /// Deletes a task and retracts it from its project's task list.
    ///
    /// Returns the deleted task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::TaskNotFound`] or repository errors.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskSchedulingResult<Task> {
        let (task, _guard) = self.lock_task(task_id).await?;
        let project_id = task.project_id();

        self.tasks.delete(task_id).await.map_err(|err| match err {
            TaskRepositoryError::NotFound(id) => TaskSchedulingError::TaskNotFound(id),
            other => other.into(),
        })?;
        match self.projects.detach_task(project_id, task_id).await {
            Ok(_) | Err(ProjectRepositoryError::NotFound(_)) => {}
            Err(err) => return Err(err.into()),
        }

        tracing::info!(project_id = %project_id, task_id = %task_id, "task deleted");
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn find_task(&self, task_id: TaskId) -> TaskSchedulingResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    /// Lists the tasks of a project that pass `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSchedulingError::ProjectNotFound`] or repository errors.
    pub async fn list_tasks(
        &self,
        project_id: ProjectId,
        filter: TaskFilter,
    ) -> TaskSchedulingResult<Vec<Task>> {
        self.ensure_project_exists(project_id).await?;
        let tasks = self.tasks.list_for_project(project_id).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect())
    }

    async fn ensure_project_exists(&self, project_id: ProjectId) -> TaskSchedulingResult<()> {
        self.projects
            .find_by_id(project_id)
            .await?
            .map(|_| ())
            .ok_or(TaskSchedulingError::ProjectNotFound(project_id))
    }

    async fn find_task_or_error(&self, task_id: TaskId) -> TaskSchedulingResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskSchedulingError::TaskNotFound(task_id))
    }

    /// Locks the task's project and returns the task as stored under the lock.
    async fn lock_task(&self, task_id: TaskId) -> TaskSchedulingResult<(Task, ProjectGuard)> {
        let project_id = self.find_task_or_error(task_id).await?.project_id();
        let guard = self.locks.acquire(project_id).await;
        let task = self.find_task_or_error(task_id).await?;
        Ok((task, guard))
    }

    async fn discard_orphan(&self, task: &Task) {
        if let Err(err) = self.tasks.delete(task.id()).await {
            tracing::warn!(
                task_id = %task.id(),
                error = %err,
                "failed to remove task whose project reference could not be recorded"
            );
        }
    }
}

fn reject_conflicts(
    conflicts: Vec<crate::task::domain::ConflictingTask>,
) -> TaskSchedulingResult<()> {
    match ScheduleConflict::from_conflicts(conflicts) {
        Some(conflict) => Err(conflict.into()),
        None => Ok(()),
    }
}

fn log_rejection(project_id: ProjectId, task_id: Option<TaskId>, err: &TaskSchedulingError) {
    if let TaskSchedulingError::Conflict(conflict) = err {
        tracing::info!(
            project_id = %project_id,
            task_id = ?task_id.map(|id| id.to_string()),
            conflicts = conflict.conflicts().len(),
            "task window rejected"
        );
    }
}
