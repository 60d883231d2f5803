//! Scheduling-conflict detection within a single project.
//!
//! Conflict checks are project-local: callers pass the complete set of tasks
//! currently owned by the candidate's project and nothing else.

use super::{Task, TaskId, TaskInterval};
use serde::Serialize;
use thiserror::Error;

/// An existing task whose window overlaps a candidate window.
///
/// Carries enough of the task to render a conflict report to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictingTask {
    /// Identifier of the conflicting task.
    pub id: TaskId,
    /// Title of the conflicting task.
    pub title: String,
    /// Description of the conflicting task.
    pub description: String,
    /// Window occupied by the conflicting task.
    pub interval: TaskInterval,
}

impl From<&Task> for ConflictingTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            interval: task.interval(),
        }
    }
}

/// A rejected write together with every task it would overlap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task window overlaps {} existing task(s)", .conflicts.len())]
pub struct ScheduleConflict {
    conflicts: Vec<ConflictingTask>,
}

impl ScheduleConflict {
    /// Wraps a conflict list, returning `None` when the list is empty.
    #[must_use]
    pub fn from_conflicts(conflicts: Vec<ConflictingTask>) -> Option<Self> {
        if conflicts.is_empty() {
            None
        } else {
            Some(Self { conflicts })
        }
    }

    /// Returns the conflicting tasks in the order they were found.
    #[must_use]
    pub fn conflicts(&self) -> &[ConflictingTask] {
        &self.conflicts
    }

    /// Consumes the error and returns the conflicting tasks.
    #[must_use]
    pub fn into_conflicts(self) -> Vec<ConflictingTask> {
        self.conflicts
    }
}

/// Returns every task in `existing` whose window overlaps `candidate`.
///
/// The task whose identifier equals `exclude` is skipped, so an update is
/// never reported as conflicting with its own previous window. Results keep
/// the iteration order of `existing`; an empty result means the write may
/// proceed.
#[must_use]
pub fn find_conflicts<'a>(
    candidate: &TaskInterval,
    existing: impl IntoIterator<Item = &'a Task>,
    exclude: Option<TaskId>,
) -> Vec<ConflictingTask> {
    existing
        .into_iter()
        .filter(|task| is_conflicting(task, candidate, exclude))
        .map(ConflictingTask::from)
        .collect()
}

/// Returns the first task in `existing` that overlaps `candidate`.
///
/// Same rules as [`find_conflicts`], stopping at the first hit.
#[must_use]
pub fn first_conflict<'a>(
    candidate: &TaskInterval,
    existing: impl IntoIterator<Item = &'a Task>,
    exclude: Option<TaskId>,
) -> Option<ConflictingTask> {
    existing
        .into_iter()
        .find(|task| is_conflicting(task, candidate, exclude))
        .map(ConflictingTask::from)
}

fn is_conflicting(task: &Task, candidate: &TaskInterval, exclude: Option<TaskId>) -> bool {
    exclude != Some(task.id()) && task.interval().overlaps(candidate)
}
