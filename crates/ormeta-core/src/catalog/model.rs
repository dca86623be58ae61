//! Model definitions.

use super::property::PropertyDefinition;
use super::relation::RelationDefinition;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Setting listing property names hidden from serialized output.
pub const HIDDEN_PROPERTIES: &str = "hiddenProperties";

/// The finalized schema of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDefinition {
    /// Model name.
    pub name: String,
    /// Property definitions keyed by name.
    pub properties: BTreeMap<String, PropertyDefinition>,
    /// Relation definitions keyed by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, RelationDefinition>,
    /// Free-form model settings.
    pub settings: Map<String, Value>,
}

/// Model-level declaration input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelSettings {
    /// Explicit model name; the entity's own name when absent.
    pub name: Option<String>,
    /// Free-form settings.
    pub settings: Map<String, Value>,
}

impl ModelDefinition {
    /// Create an empty model definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            relations: BTreeMap::new(),
            settings: Map::new(),
        }
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: Map<String, Value>) -> Self {
        self.settings = settings;
        self
    }

    /// Add a property, for chaining.
    pub fn with_property(mut self, name: impl Into<String>, property: PropertyDefinition) -> Self {
        self.add_property(name, property);
        self
    }

    /// Add or replace a property.
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        property: PropertyDefinition,
    ) -> &mut Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Add or replace a relation.
    pub fn add_relation(&mut self, relation: RelationDefinition) -> &mut Self {
        self.relations.insert(relation.name.clone(), relation);
        self
    }

    /// Get a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    /// Get a relation by name.
    pub fn relation(&self, name: &str) -> Option<&RelationDefinition> {
        self.relations.get(name)
    }

    /// Names of the id properties, in property order.
    pub fn id_properties(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|(_, p)| p.is_id())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Name of the single id property, or the first of a composite id.
    pub fn id_name(&self) -> Option<&str> {
        self.id_properties().into_iter().next()
    }

    /// Check whether a property is hidden, either on the property itself or
    /// through the `hiddenProperties` model setting.
    pub fn is_hidden(&self, name: &str) -> bool {
        if self.property(name).is_some_and(|p| p.is_hidden()) {
            return true;
        }
        match self.settings.get(HIDDEN_PROPERTIES) {
            Some(Value::Array(names)) => names.iter().any(|n| n.as_str() == Some(name)),
            _ => false,
        }
    }

    /// Check whether the model is strict (rejects unknown properties).
    ///
    /// Models are strict unless `strict` is explicitly `false`.
    pub fn is_strict(&self) -> bool {
        self.settings
            .get("strict")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

impl ModelSettings {
    /// Create empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a free-form setting.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}
