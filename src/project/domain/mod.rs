//! Domain model for projects.
//!
//! A project owns the list of task references appended as tasks are
//! scheduled into it and retracted as they are deleted.

mod error;
mod ids;
mod project;

pub use error::ProjectDomainError;
pub use ids::ProjectId;
pub use project::{PersistedProjectData, Project};
