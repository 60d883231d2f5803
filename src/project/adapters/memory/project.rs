//! In-memory repository for projects.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    creation_order: Vec<ProjectId>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.creation_order.push(project.id());
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update_details(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *stored = Project::from_persisted(PersistedProjectData {
            id: stored.id(),
            name: project.name().to_owned(),
            description: project.description().to_owned(),
            task_ids: stored.task_ids().to_vec(),
            created_at: stored.created_at(),
            updated_at: project.updated_at(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .creation_order
            .iter()
            .filter_map(|id| state.projects.get(id).cloned())
            .collect())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .projects
            .remove(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        state.creation_order.retain(|existing| *existing != id);
        Ok(())
    }

    async fn attach_task(&self, id: ProjectId, task_id: TaskId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let project = state
            .projects
            .get_mut(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        project.attach_task(task_id);
        Ok(())
    }

    async fn detach_task(
        &self,
        id: ProjectId,
        task_id: TaskId,
    ) -> ProjectRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let project = state
            .projects
            .get_mut(&id)
            .ok_or(ProjectRepositoryError::NotFound(id))?;
        Ok(project.detach_task(task_id))
    }
}
