//! Step definitions for task scheduling scenarios.

pub mod given;
pub mod when;
