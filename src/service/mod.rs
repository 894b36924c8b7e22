//! Services: request validation and per-entity SQL.

mod developers;
mod executor;
mod projects;
mod validation;
pub use developers::DeveloperService;
pub use projects::ProjectService;
pub use validation::{Payload, RequestValidator};
