//! Relation definitions between models.

use super::types::ModelRef;
use serde::Serialize;

/// Kind of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// The source holds a foreign key to one target.
    BelongsTo,
    /// Many targets hold a foreign key to the source.
    HasMany,
    /// One target holds a foreign key to the source.
    HasOne,
    /// The source holds an array of foreign keys to targets.
    ReferencesMany,
}

impl RelationKind {
    /// Check whether the relation resolves to many targets.
    pub fn is_to_many(&self) -> bool {
        matches!(self, RelationKind::HasMany | RelationKind::ReferencesMany)
    }

    /// Check whether the foreign key lives on the source model.
    pub fn is_owning(&self) -> bool {
        matches!(self, RelationKind::BelongsTo | RelationKind::ReferencesMany)
    }
}

/// A relation from one model to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationDefinition {
    /// Relation name (unique within the source model).
    pub name: String,
    /// Relation kind.
    #[serde(rename = "type")]
    pub kind: RelationKind,
    /// Source model.
    pub source: ModelRef,
    /// Target model.
    pub target: ModelRef,
    /// Key property on the source model.
    pub key_from: String,
    /// Key property on the target model.
    pub key_to: String,
    /// Join model for many-to-many through relations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<ModelRef>,
}

impl RelationDefinition {
    /// Create a belongs-to relation.
    pub fn belongs_to(
        name: impl Into<String>,
        source: ModelRef,
        key_from: impl Into<String>,
        target: ModelRef,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::BelongsTo,
            source,
            target,
            key_from: key_from.into(),
            key_to: "id".to_string(),
            through: None,
        }
    }

    /// Create a has-many relation.
    pub fn has_many(
        name: impl Into<String>,
        source: ModelRef,
        target: ModelRef,
        key_to: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::HasMany,
            source,
            target,
            key_from: "id".to_string(),
            key_to: key_to.into(),
            through: None,
        }
    }

    /// Create a has-one relation.
    pub fn has_one(
        name: impl Into<String>,
        source: ModelRef,
        target: ModelRef,
        key_to: impl Into<String>,
    ) -> Self {
        Self {
            kind: RelationKind::HasOne,
            ..Self::has_many(name, source, target, key_to)
        }
    }

    /// Create a references-many relation.
    pub fn references_many(
        name: impl Into<String>,
        source: ModelRef,
        key_from: impl Into<String>,
        target: ModelRef,
    ) -> Self {
        Self {
            kind: RelationKind::ReferencesMany,
            ..Self::belongs_to(name, source, key_from, target)
        }
    }

    /// Set the key property on the target model.
    pub fn with_key_to(mut self, key_to: impl Into<String>) -> Self {
        self.key_to = key_to.into();
        self
    }

    /// Route a has-many relation through a join model.
    pub fn with_through(mut self, through: ModelRef) -> Self {
        self.through = Some(through);
        self
    }
}

/// Default relation name for a foreign-key member: the member without its
/// `suffix`, or the member itself when it does not carry the suffix.
pub(crate) fn relation_name_from_key(key_member: &str, suffix: &str) -> String {
    match key_member.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => key_member.to_string(),
    }
}

/// Default foreign key pointing back at `entity`: `orderItem` + `Id` for
/// `OrderItem`.
pub(crate) fn default_foreign_key(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => format!("{}{}Id", first.to_lowercase(), chars.as_str()),
        None => "id".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Entity;

    struct Customer;
    struct Order;

    impl Entity for Customer {
        const NAME: &'static str = "Customer";
    }

    impl Entity for Order {
        const NAME: &'static str = "Order";
    }

    #[test]
    fn test_belongs_to() {
        let rel = RelationDefinition::belongs_to(
            "customer",
            ModelRef::of::<Order>(),
            "customerId",
            ModelRef::of::<Customer>(),
        );

        assert_eq!(rel.kind, RelationKind::BelongsTo);
        assert_eq!(rel.key_to, "id");
        assert!(rel.kind.is_owning());
        assert!(!rel.kind.is_to_many());
    }

    #[test]
    fn test_has_one_inherits_has_many_keys() {
        let rel = RelationDefinition::has_one(
            "latestOrder",
            ModelRef::of::<Customer>(),
            ModelRef::of::<Order>(),
            "customerId",
        );

        assert_eq!(rel.kind, RelationKind::HasOne);
        assert_eq!(rel.key_from, "id");
        assert_eq!(rel.key_to, "customerId");
    }

    #[test]
    fn test_naming_helpers() {
        assert_eq!(relation_name_from_key("customerId", "Id"), "customer");
        assert_eq!(relation_name_from_key("owner", "Id"), "owner");
        assert_eq!(relation_name_from_key("Id", "Id"), "Id");
        assert_eq!(relation_name_from_key("accountIds", "Ids"), "account");
        assert_eq!(default_foreign_key("OrderItem"), "orderItemId");
        assert_eq!(default_foreign_key(""), "id");
    }
}
