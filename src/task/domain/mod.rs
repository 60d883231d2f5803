//! Domain model for time-bounded tasks.
//!
//! The task domain owns the interval overlap rule and the conflict validator.
//! Both operate on plain values; persistence stays outside this boundary.

mod conflict;
mod error;
mod ids;
mod interval;
mod task;

pub use conflict::{ConflictingTask, ScheduleConflict, find_conflicts, first_conflict};
pub use error::TaskDomainError;
pub use ids::TaskId;
pub use interval::{TaskInterval, intervals_overlap};
pub use task::{PersistedTaskData, Task};
