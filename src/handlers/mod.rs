//! HTTP handlers for developers and projects.

pub mod developers;
pub mod projects;
