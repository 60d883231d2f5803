//! Application services for task scheduling.

mod locks;
mod scheduling;

pub use locks::{ProjectGuard, ProjectLocks};
pub use scheduling::{
    CreateTaskRequest, TaskFilter, TaskSchedulingError, TaskSchedulingResult,
    TaskSchedulingService, UpdateTaskRequest,
};
