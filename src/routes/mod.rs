//! Router assembly.

mod api;
mod common;

pub use api::{developer_routes, project_routes};
pub use common::common_routes;
