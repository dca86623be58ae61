//! Relation declarations.

use tracing::debug;

use super::registry::{Registry, RELATIONS};
use crate::catalog::{
    default_foreign_key, relation_name_from_key, Entity, ModelRef, PropertyDefinition,
    RelationDefinition,
};
use crate::error::Result;

impl Registry {
    /// Declare that `S` belongs to `D` through the foreign key `key_member`.
    ///
    /// The relation is named `name`, or `key_member` without its `Id` suffix.
    /// `key_member` is declared as a property of `S`.
    pub fn declare_belongs_to<S: Entity, D: Entity>(&self, key_member: &str, name: Option<&str>) {
        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| relation_name_from_key(key_member, "Id"));
        let relation = RelationDefinition::belongs_to(
            name,
            ModelRef::of::<S>(),
            key_member,
            ModelRef::of::<D>(),
        );

        self.record_relation::<S>(relation);
        self.declare_property::<S>(key_member, PropertyDefinition::new());
    }

    /// Declare that `S` references many `D` through the key array `key_member`.
    ///
    /// The relation is named `name`, or `key_member` without its `Ids`
    /// suffix. `key_member` is declared as an array property of `S` and, like
    /// [`declare_array_property`](Self::declare_array_property), must be
    /// declared as a sequence on `S`.
    pub fn declare_references_many<S: Entity, D: Entity>(
        &self,
        key_member: &str,
        name: Option<&str>,
    ) -> Result<()> {
        self.check_sequence_shape::<S>(key_member)?;

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| relation_name_from_key(key_member, "Ids"));
        let relation = RelationDefinition::references_many(
            name,
            ModelRef::of::<S>(),
            key_member,
            ModelRef::of::<D>(),
        );

        self.record_relation::<S>(relation);
        self.declare_property::<S>(key_member, PropertyDefinition::new().with_array(true));
        Ok(())
    }

    /// Declare that many `D` point back at `S` through `key_to`.
    ///
    /// `key_to` defaults to the camel-cased name of `S` followed by `Id`.
    pub fn declare_has_many<S: Entity, D: Entity>(&self, member: &str, key_to: Option<&str>) {
        let key_to = key_to
            .map(str::to_string)
            .unwrap_or_else(|| default_foreign_key(S::NAME));
        let relation =
            RelationDefinition::has_many(member, ModelRef::of::<S>(), ModelRef::of::<D>(), key_to);
        self.record_relation::<S>(relation);
    }

    /// Declare that one `D` points back at `S` through `key_to`.
    pub fn declare_has_one<S: Entity, D: Entity>(&self, member: &str, key_to: Option<&str>) {
        let key_to = key_to
            .map(str::to_string)
            .unwrap_or_else(|| default_foreign_key(S::NAME));
        let relation =
            RelationDefinition::has_one(member, ModelRef::of::<S>(), ModelRef::of::<D>(), key_to);
        self.record_relation::<S>(relation);
    }

    /// Record a relation on `S`, replacing one with the same name.
    pub fn declare_relation<S: Entity>(&self, relation: RelationDefinition) {
        self.record_relation::<S>(relation);
    }

    fn record_relation<S: Entity>(&self, relation: RelationDefinition) {
        debug!(
            entity = S::NAME,
            relation = %relation.name,
            kind = ?relation.kind,
            target = %relation.target,
            "Declaring relation"
        );
        let name = relation.name.clone();
        self.store()
            .record(RELATIONS, ModelRef::of::<S>(), Some(&name), relation);
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{
        Entity, Member, ModelRef, ModelSettings, PropertyDefinition, RelationDefinition,
        RelationKind, ScalarType, TypeRef,
    };
    use crate::declare::Registry;
    use crate::error::Error;

    struct Customer;
    struct Order;
    struct Account;

    impl Entity for Customer {
        const NAME: &'static str = "Customer";

        fn members() -> Vec<Member> {
            vec![Member::of::<String>("id"), Member::of::<Vec<u64>>("accountIds")]
        }
    }

    impl Entity for Order {
        const NAME: &'static str = "Order";

        fn members() -> Vec<Member> {
            vec![Member::of::<u64>("id")]
        }
    }

    impl Entity for Account {
        const NAME: &'static str = "Account";
    }

    #[test]
    fn test_belongs_to_declares_key_property() {
        let registry = Registry::new();
        registry.declare_belongs_to::<Order, Customer>("customerId", None);

        let model = registry.declare_model::<Order>(ModelSettings::new());
        let relation = model.relation("customer").unwrap();

        assert_eq!(relation.kind, RelationKind::BelongsTo);
        assert_eq!(relation.key_from, "customerId");
        assert_eq!(relation.key_to, "id");
        assert_eq!(relation.target, ModelRef::of::<Customer>());
        assert!(model.property("customerId").is_some());
    }

    #[test]
    fn test_foreign_key_type_from_target_id() {
        let registry = Registry::new();
        registry.declare_property::<Customer>("id", PropertyDefinition::new().with_id(true));
        registry.declare_model::<Customer>(ModelSettings::new());

        registry.declare_belongs_to::<Order, Customer>("customerId", Some("buyer"));
        let model = registry.declare_model::<Order>(ModelSettings::new());

        assert!(model.relation("buyer").is_some());
        assert_eq!(
            model.properties["customerId"].type_ref,
            Some(TypeRef::Scalar(ScalarType::String))
        );
    }

    #[test]
    fn test_references_many() {
        let registry = Registry::new();
        registry
            .declare_references_many::<Customer, Account>("accountIds", None)
            .unwrap();

        let model = registry.declare_model::<Customer>(ModelSettings::new());
        let relation = model.relation("account").unwrap();

        assert_eq!(relation.kind, RelationKind::ReferencesMany);
        assert!(relation.kind.is_to_many());
        let keys = &model.properties["accountIds"];
        assert!(keys.is_array());
        assert_eq!(keys.type_ref, Some(TypeRef::Scalar(ScalarType::Integer)));
    }

    #[test]
    fn test_references_many_requires_sequence_key() {
        let registry = Registry::new();

        let err = registry
            .declare_references_many::<Order, Account>("id", None)
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidShapeMismatch {
                entity: "Order".to_string(),
                member: "id".to_string(),
                declared: "integer".to_string(),
            }
        );

        let err = registry
            .declare_references_many::<Order, Account>("accountIds", Some("accounts"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidShapeMismatch { .. }));

        let model = registry.declare_model::<Order>(ModelSettings::new());
        assert!(model.relations.is_empty());
        assert!(model.properties.is_empty());
    }

    #[test]
    fn test_has_many_and_has_one() {
        let registry = Registry::new();
        registry.declare_has_many::<Customer, Order>("orders", None);
        registry.declare_has_one::<Customer, Account>("account", Some("ownerId"));

        let model = registry.declare_model::<Customer>(ModelSettings::new());

        let orders = model.relation("orders").unwrap();
        assert_eq!(orders.kind, RelationKind::HasMany);
        assert_eq!(orders.key_to, "customerId");
        assert!(model.property("orders").is_none());

        let account = model.relation("account").unwrap();
        assert_eq!(account.kind, RelationKind::HasOne);
        assert_eq!(account.key_to, "ownerId");
    }

    #[test]
    fn test_relation_redeclaration_replaces() {
        let registry = Registry::new();
        registry.declare_has_many::<Customer, Order>("orders", None);
        registry.declare_has_many::<Customer, Order>("orders", Some("buyerId"));

        let model = registry.declare_model::<Customer>(ModelSettings::new());
        assert_eq!(model.relations.len(), 1);
        assert_eq!(model.relations["orders"].key_to, "buyerId");
    }

    #[test]
    fn test_declare_relation_keeps_custom_fields() {
        let registry = Registry::new();
        let relation = RelationDefinition::has_many(
            "accounts",
            ModelRef::of::<Customer>(),
            ModelRef::of::<Account>(),
            "holderId",
        )
        .with_key_to("ownerId")
        .with_through(ModelRef::of::<Order>());
        registry.declare_relation::<Customer>(relation.clone());

        let model = registry.declare_model::<Customer>(ModelSettings::new());
        let accounts = model.relation("accounts").unwrap();
        assert_eq!(accounts, &relation);
        assert_eq!(accounts.key_to, "ownerId");
        assert_eq!(accounts.through, Some(ModelRef::of::<Order>()));
    }
}
