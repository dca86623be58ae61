//! Core type definitions for the catalog.

use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::entity::Entity;

/// Scalar value types a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Boolean value.
    Boolean,
    /// Floating point number.
    Number,
    /// Integer number.
    Integer,
    /// UTF-8 string.
    String,
    /// Date/time value.
    Date,
    /// Binary data.
    Buffer,
    /// Free-form object.
    Object,
    /// Any value.
    Any,
}

impl ScalarType {
    /// Schema name of this scalar.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Number => "number",
            ScalarType::Integer => "integer",
            ScalarType::String => "string",
            ScalarType::Date => "date",
            ScalarType::Buffer => "buffer",
            ScalarType::Object => "object",
            ScalarType::Any => "any",
        }
    }

    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Number | ScalarType::Integer)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an entity type.
///
/// Identity is the Rust `TypeId`; the name is carried along for schemas and
/// error messages.
#[derive(Debug, Clone, Copy)]
pub struct ModelRef {
    type_id: TypeId,
    name: &'static str,
}

impl ModelRef {
    /// Reference the entity type `T`.
    pub fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    /// Declared name of the referenced entity.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rust type identity of the referenced entity.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for ModelRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ModelRef {}

impl Hash for ModelRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for ModelRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// The `type` of a property.
///
/// For array properties this is the element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A scalar value.
    Scalar(ScalarType),
    /// An instance of another entity.
    Model(ModelRef),
    /// One of several entities (`oneOf`).
    Union(Vec<ModelRef>),
    /// Type could not be determined.
    Unknown,
}

impl TypeRef {
    /// Check whether the type is known.
    pub fn is_known(&self) -> bool {
        !matches!(self, TypeRef::Unknown)
    }

    /// Get the union alternatives, if this is a union type.
    pub fn union_members(&self) -> Option<&[ModelRef]> {
        match self {
            TypeRef::Union(refs) => Some(refs),
            _ => None,
        }
    }
}

impl From<ScalarType> for TypeRef {
    fn from(scalar: ScalarType) -> Self {
        TypeRef::Scalar(scalar)
    }
}

impl From<ModelRef> for TypeRef {
    fn from(model: ModelRef) -> Self {
        TypeRef::Model(model)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Scalar(s) => write!(f, "{s}"),
            TypeRef::Model(m) => write!(f, "{m}"),
            TypeRef::Union(refs) => {
                let names: Vec<&str> = refs.iter().map(|r| r.name()).collect();
                write!(f, "oneOf({})", names.join(" | "))
            }
            TypeRef::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypeRef::Scalar(s) => serializer.serialize_str(s.as_str()),
            TypeRef::Model(m) => m.serialize(serializer),
            TypeRef::Union(refs) => refs.serialize(serializer),
            TypeRef::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Static shape of an entity member, as written in its Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// A scalar value.
    Scalar(ScalarType),
    /// An entity instance.
    Model(ModelRef),
    /// A sequence of values (`Vec<T>`, sets).
    Sequence(Box<DeclaredType>),
    /// An optional value (`Option<T>`).
    Optional(Box<DeclaredType>),
    /// Shape is not available.
    Unknown,
}

impl DeclaredType {
    /// Shape of the Rust type `T`.
    pub fn of<T: Typed + ?Sized>() -> Self {
        T::declared_type()
    }

    /// Shape of the entity type `T`.
    pub fn model<T: Entity>() -> Self {
        DeclaredType::Model(ModelRef::of::<T>())
    }

    /// A sequence of `element`.
    pub fn sequence(element: DeclaredType) -> Self {
        DeclaredType::Sequence(Box::new(element))
    }

    /// An optional `inner`.
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Optional(Box::new(inner))
    }

    /// Check whether values of this shape are sequences.
    ///
    /// `Option<Vec<T>>` counts as a sequence.
    pub fn is_sequence(&self) -> bool {
        match self {
            DeclaredType::Sequence(_) => true,
            DeclaredType::Optional(inner) => inner.is_sequence(),
            _ => false,
        }
    }

    /// Check whether the shape is known.
    pub fn is_known(&self) -> bool {
        !matches!(self, DeclaredType::Unknown)
    }

    /// Resolve the property type for this shape.
    ///
    /// Returns the type and whether the property holds a sequence of it.
    /// Nested sequences resolve to an unknown element type.
    pub fn resolve(&self) -> (TypeRef, bool) {
        match self {
            DeclaredType::Scalar(s) => (TypeRef::Scalar(*s), false),
            DeclaredType::Model(m) => (TypeRef::Model(*m), false),
            DeclaredType::Optional(inner) => inner.resolve(),
            DeclaredType::Sequence(element) => match element.resolve() {
                (ty, false) => (ty, true),
                (_, true) => (TypeRef::Unknown, true),
            },
            DeclaredType::Unknown => (TypeRef::Unknown, false),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Scalar(s) => write!(f, "{s}"),
            DeclaredType::Model(m) => write!(f, "{m}"),
            DeclaredType::Sequence(e) => write!(f, "Vec<{e}>"),
            DeclaredType::Optional(i) => write!(f, "Option<{i}>"),
            DeclaredType::Unknown => f.write_str("unknown"),
        }
    }
}

/// Rust types whose shape can be captured as a [`DeclaredType`].
///
/// Implemented for the standard scalar types and containers. Entity types
/// implement it through [`impl_typed!`](crate::impl_typed).
pub trait Typed {
    /// Static shape of the type.
    fn declared_type() -> DeclaredType;
}

macro_rules! scalar_typed {
    ($scalar:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Typed for $ty {
                fn declared_type() -> DeclaredType {
                    DeclaredType::Scalar(ScalarType::$scalar)
                }
            }
        )+
    };
}

scalar_typed!(Boolean => bool);
scalar_typed!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
scalar_typed!(Number => f32, f64);
scalar_typed!(String => String, str, char);
scalar_typed!(Object => serde_json::Map<String, serde_json::Value>);
scalar_typed!(Any => serde_json::Value);

impl<T: Typed> Typed for Vec<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::sequence(T::declared_type())
    }
}

impl<T: Typed> Typed for [T] {
    fn declared_type() -> DeclaredType {
        DeclaredType::sequence(T::declared_type())
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::sequence(T::declared_type())
    }
}

impl<T: Typed, S> Typed for HashSet<T, S> {
    fn declared_type() -> DeclaredType {
        DeclaredType::sequence(T::declared_type())
    }
}

impl<T: Typed> Typed for Option<T> {
    fn declared_type() -> DeclaredType {
        DeclaredType::optional(T::declared_type())
    }
}

/// Implement [`Typed`] for one or more entity types.
///
/// ```ignore
/// impl_typed!(Customer, Order);
/// ```
#[macro_export]
macro_rules! impl_typed {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::catalog::Typed for $ty {
                fn declared_type() -> $crate::catalog::DeclaredType {
                    $crate::catalog::DeclaredType::model::<$ty>()
                }
            }
        )+
    };
}
