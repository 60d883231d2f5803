//! Project aggregate root.

use super::{ProjectDomainError, ProjectId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A named container of non-overlapping tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    task_ids: Vec<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted task references in attachment order.
    pub task_ids: Vec<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project with no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when the name or description is blank.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let (validated_name, validated_description) =
            validate_details(name.into(), description.into())?;
        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name: validated_name,
            description: validated_description,
            task_ids: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            task_ids: data.task_ids,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the referenced task identifiers in attachment order.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when either value is blank. The
    /// project is left untouched on error.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        let (validated_name, validated_description) =
            validate_details(name.into(), description.into())?;
        self.name = validated_name;
        self.description = validated_description;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Appends a task reference. Returns `false` if it was already present.
    pub fn attach_task(&mut self, task_id: TaskId) -> bool {
        if self.task_ids.contains(&task_id) {
            return false;
        }
        self.task_ids.push(task_id);
        true
    }

    /// Removes a task reference. Returns `false` if it was not present.
    pub fn detach_task(&mut self, task_id: TaskId) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|id| *id != task_id);
        self.task_ids.len() != before
    }
}

fn validate_details(
    name: String,
    description: String,
) -> Result<(String, String), ProjectDomainError> {
    let trimmed_name = name.trim();
    if trimmed_name.is_empty() {
        return Err(ProjectDomainError::EmptyName);
    }
    let trimmed_description = description.trim();
    if trimmed_description.is_empty() {
        return Err(ProjectDomainError::EmptyDescription);
    }
    Ok((trimmed_name.to_owned(), trimmed_description.to_owned()))
}
