//! Request handlers, one module per resource.

mod projects;
mod tasks;

pub use projects::{create_project, delete_project, get_project, list_projects, update_project};
pub use tasks::{
    complete_task, create_task, delete_task, list_completed_tasks, list_tasks,
    list_uncompleted_tasks, update_task,
};

use std::str::FromStr;

use super::error::ApiError;

/// Parses a path identifier, reporting malformed values as bad requests.
fn parse_id<I: FromStr>(kind: &str, raw: &str) -> Result<I, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::validation(format!("Invalid {kind} id: {raw}")))
}
