//! Request and response bodies.
//!
//! Bodies use camelCase keys. Instants are RFC 3339 strings; offsets are
//! accepted on input and normalized to UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::project::{
    domain::{Project, ProjectId},
    services::ProjectDetailsRequest,
};
use crate::task::{
    domain::{ConflictingTask, Task, TaskId},
    services::{CreateTaskRequest, UpdateTaskRequest},
};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of `POST /projects` and `PUT /projects/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    /// Project name.
    pub name: Option<String>,
    /// Project description.
    pub description: Option<String>,
}

impl ProjectPayload {
    /// Checks required fields and converts into a service request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the required fields when any
    /// is missing or empty.
    pub fn into_request(self) -> Result<ProjectDetailsRequest, ApiError> {
        match (non_empty(self.name), non_empty(self.description)) {
            (Some(name), Some(description)) => Ok(ProjectDetailsRequest::new(name, description)),
            _ => Err(ApiError::validation(
                "Missing required fields: name, description",
            )),
        }
    }
}

/// Body of `POST /projects/{projectId}/tasks` and `PUT /tasks/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Task title.
    pub title: Option<String>,
    /// Optional task description.
    pub description: Option<String>,
    /// Inclusive start instant, RFC 3339.
    pub start_time: Option<String>,
    /// Exclusive end instant, RFC 3339.
    pub end_time: Option<String>,
}

struct TaskFields {
    title: String,
    description: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TaskPayload {
    /// Converts into a creation request for the given project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for missing fields or unparseable
    /// instants.
    pub fn into_create_request(
        self,
        project_id: ProjectId,
    ) -> Result<CreateTaskRequest, ApiError> {
        let fields = self.into_fields()?;
        Ok(
            CreateTaskRequest::new(project_id, fields.title, fields.start, fields.end)
                .with_description(fields.description),
        )
    }

    /// Converts into an update request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for missing fields or unparseable
    /// instants.
    pub fn into_update_request(self) -> Result<UpdateTaskRequest, ApiError> {
        let fields = self.into_fields()?;
        Ok(UpdateTaskRequest::new(fields.title, fields.start, fields.end)
            .with_description(fields.description))
    }

    fn into_fields(self) -> Result<TaskFields, ApiError> {
        let (Some(title), Some(start), Some(end)) = (
            non_empty(self.title),
            non_empty(self.start_time),
            non_empty(self.end_time),
        ) else {
            return Err(ApiError::validation(
                "Missing required fields: title, startTime, endTime",
            ));
        };
        Ok(TaskFields {
            title,
            description: self.description.unwrap_or_default(),
            start: parse_instant("startTime", &start)?,
            end: parse_instant("endTime", &end)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// Parses an RFC 3339 instant and normalizes it to UTC.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] naming `field` when `value` is not a
/// valid RFC 3339 timestamp.
pub fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| {
            ApiError::validation_detail(
                format!("{field} must be an RFC 3339 timestamp, got '{value}'"),
                err.to_string(),
            )
        })
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Success envelope wrapping every response payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Human-readable outcome.
    pub message: String,
    /// Response payload; `null` for deletions.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload.
    #[must_use]
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure summary.
    pub message: String,
    /// Optional diagnostic detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Tasks overlapping a rejected window.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictResponse>,
}

impl ErrorBody {
    pub(super) const fn new(message: String, error: Option<String>) -> Self {
        Self {
            message,
            error,
            conflicts: Vec::new(),
        }
    }

    pub(super) fn with_conflicts(mut self, conflicts: Vec<ConflictResponse>) -> Self {
        self.conflicts = conflicts;
        self
    }
}

/// Project representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Identifiers of the project's tasks in attachment order.
    pub tasks: Vec<TaskId>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Latest modification instant.
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id(),
            name: project.name().to_owned(),
            description: project.description().to_owned(),
            tasks: project.task_ids().to_vec(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}

/// Task representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Inclusive start instant.
    pub start_time: DateTime<Utc>,
    /// Exclusive end instant.
    pub end_time: DateTime<Utc>,
    /// Completion flag.
    pub completed: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Latest modification instant.
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let interval = task.interval();
        Self {
            id: task.id(),
            project_id: task.project_id(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            start_time: interval.start(),
            end_time: interval.end(),
            completed: task.is_completed(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// One entry of a conflict report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    /// Conflicting task identifier.
    pub id: TaskId,
    /// Conflicting task title.
    pub title: String,
    /// Conflicting task description.
    pub description: String,
    /// Inclusive start instant.
    pub start_time: DateTime<Utc>,
    /// Exclusive end instant.
    pub end_time: DateTime<Utc>,
}

impl From<&ConflictingTask> for ConflictResponse {
    fn from(conflict: &ConflictingTask) -> Self {
        Self {
            id: conflict.id,
            title: conflict.title.clone(),
            description: conflict.description.clone(),
            start_time: conflict.interval.start(),
            end_time: conflict.interval.end(),
        }
    }
}
