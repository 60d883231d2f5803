//! Conflict-checked task scheduling.
//!
//! Tasks occupy half-open `[start, end)` windows inside one project, and no
//! two tasks of a project may overlap. The overlap rule and the conflict
//! validator live in [`domain`] and operate on plain values; the
//! [`services`] layer fetches a project's tasks fresh for every write and
//! serializes writes per project. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
