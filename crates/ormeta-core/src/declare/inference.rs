//! Type inference from entity member shapes.

use tracing::warn;

use crate::catalog::{DeclaredType, Entity, PropertyDefinition, TypeRef};

/// Declared shape of `member` on `T`, or [`DeclaredType::Unknown`] if `T`
/// does not list the member.
pub fn infer_type<T: Entity>(member: &str) -> DeclaredType {
    T::members()
        .into_iter()
        .find(|m| m.name == member)
        .map(|m| m.declared)
        .unwrap_or(DeclaredType::Unknown)
}

/// Fill a missing type on `property` from `T`'s member shape.
///
/// An explicit type is never overridden. Sequence shapes yield the element
/// type and set the array flag unless it was given explicitly.
pub(crate) fn complete_property<T: Entity>(member: &str, property: &mut PropertyDefinition) {
    if property.has_type() {
        return;
    }

    let declared = infer_type::<T>(member);
    let (type_ref, is_sequence) = declared.resolve();
    if !type_ref.is_known() {
        warn!(
            entity = T::NAME,
            member,
            declared = %declared,
            "Could not infer property type"
        );
    }

    property.type_ref = Some(type_ref);
    if is_sequence && property.array.is_none() {
        property.array = Some(true);
    }
}

/// Check whether a resolved property type still needs filling in.
pub(crate) fn is_unresolved(property: &PropertyDefinition) -> bool {
    matches!(property.type_ref, None | Some(TypeRef::Unknown))
}
