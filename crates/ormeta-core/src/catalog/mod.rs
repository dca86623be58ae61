//! Model catalog types.
//!
//! Definitions of models, properties, relations and the type references
//! that connect them.

mod entity;
mod model;
mod property;
mod relation;
mod types;

pub use entity::{Entity, Member};
pub use model::{ModelDefinition, ModelSettings, HIDDEN_PROPERTIES};
pub use property::{PropertyDefinition, ONE_OF, RESERVED_KEYS};
pub use relation::{RelationDefinition, RelationKind};
pub use types::{DeclaredType, ModelRef, ScalarType, TypeRef, Typed};

pub(crate) use relation::{default_foreign_key, relation_name_from_key};
