//! Row and response types. Serialized with camelCase keys.

mod developer;
mod project;

pub use developer::*;
pub use project::*;
