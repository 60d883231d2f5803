//! Error types for task domain validation.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or revising task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The interval does not start strictly before it ends.
    #[error("startTime must be earlier than endTime (got {start} .. {end})")]
    InvalidInterval {
        /// Proposed start instant.
        start: DateTime<Utc>,
        /// Proposed end instant.
        end: DateTime<Utc>,
    },
}
