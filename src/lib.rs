//! Tasklane: project and task scheduling service.
//!
//! This crate provides an HTTP API for grouping time-bounded tasks into
//! projects, with the guarantee that no two tasks of one project overlap.
//!
//! # Architecture
//!
//! Tasklane follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Interval overlap rule, conflict validation, and task scheduling
//! - [`project`]: Project catalog and task references
//! - [`http`]: Axum request boundary
//! - [`config`]: Layered server configuration
//! - [`persistence`]: `PostgreSQL` pool construction and schema bootstrap

pub mod config;
pub mod http;
pub mod persistence;
pub mod project;
pub mod task;
