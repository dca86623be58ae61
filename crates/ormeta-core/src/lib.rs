//! ORMeta Core - Model and property metadata registration.
//!
//! Entity types declare their properties, array and union typing and
//! relations through a [`Registry`]; declaring the model assembles the
//! accumulated declarations into a [`ModelDefinition`] that repository and
//! schema layers read back.

pub mod catalog;
pub mod config;
pub mod declare;
pub mod error;
pub mod metadata;

pub use catalog::{
    DeclaredType, Entity, Member, ModelDefinition, ModelRef, ModelSettings, PropertyDefinition,
    RelationDefinition, RelationKind, ScalarType, TypeRef, Typed,
};
pub use config::RegistryConfig;
pub use declare::{infer_type, ModelBuilder, Registry};
pub use error::{Error, Result};
pub use metadata::{MetadataKey, MetadataStore};
