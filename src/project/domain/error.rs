//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing or editing projects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyName,

    /// The project description is empty after trimming.
    #[error("project description must not be empty")]
    EmptyDescription,
}
