//! Per-entity declaration context.

use std::marker::PhantomData;

use serde_json::Value;

use super::registry::Registry;
use crate::catalog::{
    Entity, ModelDefinition, ModelRef, ModelSettings, PropertyDefinition, RelationDefinition,
    TypeRef,
};
use crate::error::Result;

/// Declaration context for one entity type.
///
/// Chains member declarations for `T` and is consumed by
/// [`declare`](Self::declare), which assembles the model definition:
///
/// ```ignore
/// let widget = registry
///     .model::<Widget>()
///     .property("id", PropertyDefinition::typed(ScalarType::Number).with_id(true))
///     .array_property("tags", ScalarType::String, None)?
///     .declare();
/// ```
#[must_use = "declarations are only assembled by `declare`"]
pub struct ModelBuilder<'r, T: Entity> {
    registry: &'r Registry,
    settings: ModelSettings,
    _entity: PhantomData<fn() -> T>,
}

impl<'r, T: Entity> ModelBuilder<'r, T> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            settings: ModelSettings::new(),
            _entity: PhantomData,
        }
    }

    /// Override the model name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.settings.name = Some(name.into());
        self
    }

    /// Set a model setting.
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.settings.insert(key.into(), value.into());
        self
    }

    /// Declare a property.
    pub fn property(self, member: &str, partial: PropertyDefinition) -> Self {
        self.registry.declare_property::<T>(member, partial);
        self
    }

    /// Declare a union (`oneOf`) property.
    pub fn union_property(
        self,
        member: &str,
        refs: impl IntoIterator<Item = ModelRef>,
    ) -> Result<Self> {
        self.registry.declare_union_property::<T>(member, refs)?;
        Ok(self)
    }

    /// Declare an array of a union (`oneOf`) property.
    pub fn array_union_property(
        self,
        member: &str,
        refs: impl IntoIterator<Item = ModelRef>,
    ) -> Result<Self> {
        self.registry.declare_array_union_property::<T>(member, refs)?;
        Ok(self)
    }

    /// Declare an array property.
    pub fn array_property(
        self,
        member: &str,
        element: impl Into<TypeRef>,
        partial: Option<PropertyDefinition>,
    ) -> Result<Self> {
        self.registry
            .declare_array_property::<T>(member, element, partial)?;
        Ok(self)
    }

    /// Declare a belongs-to relation through `key_member`.
    pub fn belongs_to<D: Entity>(self, key_member: &str) -> Self {
        self.registry.declare_belongs_to::<T, D>(key_member, None);
        self
    }

    /// Declare a references-many relation through `key_member`.
    pub fn references_many<D: Entity>(self, key_member: &str) -> Result<Self> {
        self.registry
            .declare_references_many::<T, D>(key_member, None)?;
        Ok(self)
    }

    /// Declare a has-many relation.
    pub fn has_many<D: Entity>(self, member: &str) -> Self {
        self.registry.declare_has_many::<T, D>(member, None);
        self
    }

    /// Declare a has-one relation.
    pub fn has_one<D: Entity>(self, member: &str) -> Self {
        self.registry.declare_has_one::<T, D>(member, None);
        self
    }

    /// Declare a fully specified relation.
    pub fn relation(self, relation: RelationDefinition) -> Self {
        self.registry.declare_relation::<T>(relation);
        self
    }

    /// Assemble and attach the model definition.
    pub fn declare(self) -> ModelDefinition {
        self.registry.declare_model::<T>(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Member, RelationKind, ScalarType};
    use crate::error::Error;
    use serde_json::json;

    struct Shelf;
    struct Book;
    struct Magazine;

    impl Entity for Shelf {
        const NAME: &'static str = "Shelf";

        fn members() -> Vec<Member> {
            vec![
                Member::of::<u32>("id"),
                Member::of::<Vec<String>>("labels"),
                Member::of::<String>("title"),
                Member::of::<Vec<u64>>("magazineIds"),
            ]
        }
    }

    impl Entity for Book {
        const NAME: &'static str = "Book";
    }

    impl Entity for Magazine {
        const NAME: &'static str = "Magazine";
    }

    #[test]
    fn test_builder_declares_model() {
        let registry = Registry::new();

        let shelf = registry
            .model::<Shelf>()
            .name("shelves")
            .setting("strict", false)
            .property("id", PropertyDefinition::new().with_id(true))
            .array_property("labels", ScalarType::String, None)
            .unwrap()
            .array_union_property(
                "items",
                [ModelRef::of::<Book>(), ModelRef::of::<Magazine>()],
            )
            .unwrap()
            .has_many::<Book>("books")
            .declare();

        assert_eq!(shelf.name, "shelves");
        assert_eq!(shelf.settings.get("strict"), Some(&json!(false)));
        assert_eq!(shelf.id_name(), Some("id"));
        assert!(shelf.properties["labels"].is_array());
        assert!(shelf.properties["items"].is_union());
        assert_eq!(shelf.relations["books"].key_to, "shelfId");
        assert_eq!(registry.model_definition::<Shelf>(), Some(shelf));
    }

    #[test]
    fn test_builder_propagates_errors() {
        let registry = Registry::new();

        let result = registry
            .model::<Shelf>()
            .array_property("title", ScalarType::String, None);
        assert!(matches!(result, Err(Error::InvalidShapeMismatch { .. })));

        let result = registry
            .model::<Shelf>()
            .union_property("item", [ModelRef::of::<Book>()]);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));

        let result = registry.model::<Shelf>().references_many::<Magazine>("title");
        assert!(matches!(result, Err(Error::InvalidShapeMismatch { .. })));

        assert!(registry.model_definition::<Shelf>().is_none());
    }

    #[test]
    fn test_builder_custom_relation() {
        let registry = Registry::new();

        let shelf = registry
            .model::<Shelf>()
            .references_many::<Magazine>("magazineIds")
            .unwrap()
            .relation(
                RelationDefinition::has_many(
                    "books",
                    ModelRef::of::<Shelf>(),
                    ModelRef::of::<Book>(),
                    "shelfId",
                )
                .with_through(ModelRef::of::<Magazine>())
                .with_key_to("rackId"),
            )
            .declare();

        let magazines = shelf.relation("magazine").unwrap();
        assert_eq!(magazines.kind, RelationKind::ReferencesMany);
        assert!(shelf.properties["magazineIds"].is_array());

        let books = shelf.relation("books").unwrap();
        assert_eq!(books.through, Some(ModelRef::of::<Magazine>()));
        assert_eq!(books.key_to, "rackId");
        assert_eq!(
            serde_json::to_value(books).unwrap()["through"],
            json!("Magazine")
        );
    }
}
