//! Model and property declarations.
//!
//! Member-level declarations (properties, arrays, unions, relations) are
//! recorded against the entity type first; declaring the model then reads
//! them back and assembles one [`ModelDefinition`](crate::catalog::ModelDefinition).

mod builder;
mod inference;
mod registry;
mod relations;

pub use builder::ModelBuilder;
pub use inference::infer_type;
pub use registry::Registry;
