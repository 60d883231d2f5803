//! In-memory adapters for project management.

mod project;

pub use project::InMemoryProjectRepository;
