//! Mapping of service failures onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::dto::{ConflictResponse, ErrorBody};
use crate::project::{ports::ProjectRepositoryError, services::ProjectCatalogError};
use crate::task::{
    domain::ConflictingTask, ports::TaskRepositoryError, services::TaskSchedulingError,
};

/// Error returned by request handlers.
///
/// Only this type knows about status codes; services report error kinds.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or violated a domain rule.
    #[error("{message}")]
    Validation {
        /// Client-facing summary.
        message: String,
        /// Optional detail, such as a parser diagnostic.
        detail: Option<String>,
    },

    /// The addressed project or task does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The proposed window overlaps other tasks of the project.
    #[error("Task overlaps with existing tasks")]
    Conflict(Vec<ConflictingTask>),

    /// The store failed.
    #[error("{message}: {detail}")]
    Internal {
        /// Client-facing summary.
        message: String,
        /// Underlying failure.
        detail: String,
    },
}

impl ApiError {
    /// Builds a validation error without detail.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: None,
        }
    }

    /// Builds a validation error carrying a diagnostic.
    #[must_use]
    pub fn validation_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Builds an internal error from a store failure.
    #[must_use]
    pub fn internal(message: impl Into<String>, source: &impl std::error::Error) -> Self {
        Self::Internal {
            message: message.into(),
            detail: source.to_string(),
        }
    }

    /// Returns the status code reported for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ErrorBody {
        let message = self.to_string();
        match self {
            Self::Validation { detail, .. } => ErrorBody::new(message, detail),
            Self::NotFound(_) => ErrorBody::new(message, None),
            Self::Conflict(tasks) => ErrorBody::new(message, None)
                .with_conflicts(tasks.iter().map(ConflictResponse::from).collect()),
            Self::Internal {
                message: summary,
                detail,
            } => ErrorBody::new(summary, Some(detail)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Internal { message, detail } => {
                tracing::error!(error = %detail, "{message}");
            }
            Self::Conflict(tasks) => {
                tracing::debug!(conflicts = tasks.len(), "responding with schedule conflict");
            }
            Self::Validation { .. } | Self::NotFound(_) => {}
        }
        (status, Json(self.into_body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_detail("Invalid JSON body", rejection.body_text())
    }
}

impl From<TaskSchedulingError> for ApiError {
    fn from(err: TaskSchedulingError) -> Self {
        match err {
            TaskSchedulingError::Domain(domain) => Self::validation(domain.to_string()),
            TaskSchedulingError::Conflict(conflict) => Self::Conflict(conflict.into_conflicts()),
            TaskSchedulingError::ProjectNotFound(id)
            | TaskSchedulingError::Repository(TaskRepositoryError::ProjectMissing(id))
            | TaskSchedulingError::ProjectRepository(ProjectRepositoryError::NotFound(id)) => {
                Self::NotFound(format!("Project {id} not found"))
            }
            TaskSchedulingError::TaskNotFound(id)
            | TaskSchedulingError::Repository(TaskRepositoryError::NotFound(id)) => {
                Self::NotFound(format!("Task {id} not found"))
            }
            TaskSchedulingError::Repository(source) => {
                Self::internal("Failed to access task store", &source)
            }
            TaskSchedulingError::ProjectRepository(source) => {
                Self::internal("Failed to access project store", &source)
            }
        }
    }
}

impl From<ProjectCatalogError> for ApiError {
    fn from(err: ProjectCatalogError) -> Self {
        match err {
            ProjectCatalogError::Domain(domain) => Self::validation(domain.to_string()),
            ProjectCatalogError::NotFound(id)
            | ProjectCatalogError::Repository(ProjectRepositoryError::NotFound(id)) => {
                Self::NotFound(format!("Project {id} not found"))
            }
            ProjectCatalogError::Repository(source) => {
                Self::internal("Failed to access project store", &source)
            }
            ProjectCatalogError::TaskRepository(source) => {
                Self::internal("Failed to access task store", &source)
            }
        }
    }
}
