//! Custom request extractors.

mod entity_id;
mod json_object;
pub use entity_id::EntityId;
pub use json_object::JsonObject;
