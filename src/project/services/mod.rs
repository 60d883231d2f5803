//! Application services for project management.

mod catalog;

pub use catalog::{
    ProjectCatalogError, ProjectCatalogResult, ProjectCatalogService, ProjectDetailsRequest,
};
