//! Entity types and their static member shapes.

use super::types::{DeclaredType, Typed};

/// A Rust type that represents a persisted entity.
///
/// `members` exposes the static shape of the entity's fields so that
/// declarations without an explicit type can fall back to it.
pub trait Entity: 'static {
    /// Entity name, used as the model name unless overridden. Should not be
    /// empty; an empty name falls back to the unqualified Rust type name.
    const NAME: &'static str;

    /// Static member shapes. Entities without shape information return none.
    fn members() -> Vec<Member> {
        Vec::new()
    }
}

/// A named member of an entity with its declared shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name.
    pub name: &'static str,
    /// Declared shape.
    pub declared: DeclaredType,
}

impl Member {
    /// Create a member with an explicit shape.
    pub fn new(name: &'static str, declared: DeclaredType) -> Self {
        Self { name, declared }
    }

    /// Create a member whose shape is taken from the Rust type `T`.
    pub fn of<T: Typed + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            declared: T::declared_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;

    struct Note;

    impl Entity for Note {
        const NAME: &'static str = "Note";

        fn members() -> Vec<Member> {
            vec![Member::of::<u64>("id"), Member::of::<Vec<String>>("tags")]
        }
    }

    struct Opaque;

    impl Entity for Opaque {
        const NAME: &'static str = "Opaque";
    }

    #[test]
    fn test_members() {
        let members = Note::members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].declared, DeclaredType::Scalar(ScalarType::Integer));
        assert!(members[1].declared.is_sequence());
    }

    #[test]
    fn test_default_members_empty() {
        assert!(Opaque::members().is_empty());
    }
}
