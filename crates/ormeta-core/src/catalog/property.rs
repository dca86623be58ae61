//! Property definitions for models.

use super::types::{ModelRef, TypeRef};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Validation key marking a union (`oneOf`) property.
pub const ONE_OF: &str = "oneOf";

/// Serialized field names of [`PropertyDefinition`]; settings with these
/// names are not emitted.
pub const RESERVED_KEYS: [&str; 8] = [
    "type",
    "array",
    "validationKey",
    "id",
    "required",
    "default",
    "hidden",
    "description",
];

/// A property definition within a model.
///
/// Every field is optional, so the same type describes both a partial
/// declaration and the finalized property. Partial definitions combine with
/// [`merge`](Self::merge).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDefinition {
    /// Value type. For array properties, the element type.
    pub type_ref: Option<TypeRef>,
    /// Whether the property holds a sequence of `type_ref`.
    pub array: Option<bool>,
    /// Validation tag interpreted by downstream validators.
    pub validation_key: Option<String>,
    /// Whether the property is (part of) the model identity.
    pub id: Option<bool>,
    /// Whether a value is required.
    pub required: Option<bool>,
    /// Default value.
    pub default: Option<Value>,
    /// Whether the property is hidden from serialized output.
    pub hidden: Option<bool>,
    /// Human readable description.
    pub description: Option<String>,
    /// Free-form settings passed through to consumers.
    ///
    /// Serialized alongside the fields above; keys in [`RESERVED_KEYS`] are
    /// skipped.
    pub settings: Map<String, Value>,
}

impl PropertyDefinition {
    /// Create an empty (fully partial) definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a definition with the given type.
    pub fn typed(type_ref: impl Into<TypeRef>) -> Self {
        Self::new().with_type(type_ref)
    }

    /// Set the type.
    pub fn with_type(mut self, type_ref: impl Into<TypeRef>) -> Self {
        self.type_ref = Some(type_ref.into());
        self
    }

    /// Set the array flag.
    pub fn with_array(mut self, array: bool) -> Self {
        self.array = Some(array);
        self
    }

    /// Set the validation key.
    pub fn with_validation_key(mut self, key: impl Into<String>) -> Self {
        self.validation_key = Some(key.into());
        self
    }

    /// Mark as an id property.
    pub fn with_id(mut self, id: bool) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the required flag.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the hidden flag.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a free-form setting.
    ///
    /// Keys in [`RESERVED_KEYS`] are ignored; use the matching field instead.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if is_reserved(&key) {
            warn!(key = %key, "Ignoring setting that shadows a property field");
            return self;
        }
        self.settings.insert(key, value.into());
        self
    }

    /// Merge a later partial definition into this one.
    ///
    /// Fields present in `later` override; absent fields keep their current
    /// value. Settings merge key by key.
    pub fn merge(&mut self, later: PropertyDefinition) {
        let PropertyDefinition {
            type_ref,
            array,
            validation_key,
            id,
            required,
            default,
            hidden,
            description,
            settings,
        } = later;

        if type_ref.is_some() {
            self.type_ref = type_ref;
        }
        if array.is_some() {
            self.array = array;
        }
        if validation_key.is_some() {
            self.validation_key = validation_key;
        }
        if id.is_some() {
            self.id = id;
        }
        if required.is_some() {
            self.required = required;
        }
        if default.is_some() {
            self.default = default;
        }
        if hidden.is_some() {
            self.hidden = hidden;
        }
        if description.is_some() {
            self.description = description;
        }
        self.settings.extend(settings);
    }

    /// Merge and return `self`, for chaining.
    pub fn merged(mut self, later: PropertyDefinition) -> Self {
        self.merge(later);
        self
    }

    /// Check if this is an id property.
    pub fn is_id(&self) -> bool {
        self.id.unwrap_or(false)
    }

    /// Check if this is an array property.
    pub fn is_array(&self) -> bool {
        self.array.unwrap_or(false)
    }

    /// Check if the property is required.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Check if the property is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    /// Check if a type has been set.
    pub fn has_type(&self) -> bool {
        self.type_ref.is_some()
    }

    /// Check if this is a union (`oneOf`) property.
    pub fn is_union(&self) -> bool {
        self.validation_key.as_deref() == Some(ONE_OF)
    }

    /// Entity types referenced by this property's type.
    pub fn referenced_models(&self) -> Vec<ModelRef> {
        match &self.type_ref {
            Some(TypeRef::Model(m)) => vec![*m],
            Some(TypeRef::Union(refs)) => refs.clone(),
            _ => Vec::new(),
        }
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

impl Serialize for PropertyDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(type_ref) = &self.type_ref {
            map.serialize_entry("type", type_ref)?;
        }
        if let Some(array) = &self.array {
            map.serialize_entry("array", array)?;
        }
        if let Some(key) = &self.validation_key {
            map.serialize_entry("validationKey", key)?;
        }
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(required) = &self.required {
            map.serialize_entry("required", required)?;
        }
        if let Some(default) = &self.default {
            map.serialize_entry("default", default)?;
        }
        if let Some(hidden) = &self.hidden {
            map.serialize_entry("hidden", hidden)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        for (key, value) in self.settings.iter().filter(|(k, _)| !is_reserved(k)) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;
    use serde_json::json;

    #[test]
    fn test_property_builder() {
        let prop = PropertyDefinition::typed(ScalarType::Number)
            .with_id(true)
            .with_required(true)
            .with_setting("generated", true);

        assert!(prop.is_id());
        assert!(prop.is_required());
        assert!(!prop.is_array());
        assert_eq!(prop.settings.get("generated"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_overrides_present_fields_only() {
        let mut prop = PropertyDefinition::typed(ScalarType::String)
            .with_required(true)
            .with_setting("length", 40);

        prop.merge(
            PropertyDefinition::new()
                .with_required(false)
                .with_description("display name")
                .with_setting("index", true),
        );

        assert_eq!(prop.type_ref, Some(TypeRef::Scalar(ScalarType::String)));
        assert_eq!(prop.required, Some(false));
        assert_eq!(prop.description.as_deref(), Some("display name"));
        assert_eq!(prop.settings.get("length"), Some(&json!(40)));
        assert_eq!(prop.settings.get("index"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let partial = PropertyDefinition::typed(ScalarType::Boolean).with_default(false);

        let once = PropertyDefinition::new().merged(partial.clone());
        let twice = PropertyDefinition::new()
            .merged(partial.clone())
            .merged(partial);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_serialize() {
        let prop = PropertyDefinition::typed(ScalarType::String)
            .with_array(true)
            .with_setting("maxItems", 5);

        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"type": "string", "array": true, "maxItems": 5})
        );
    }

    #[test]
    fn test_reserved_settings_not_duplicated() {
        let prop = PropertyDefinition::typed(ScalarType::String)
            .with_setting("type", "number")
            .with_setting("id", false);
        assert!(prop.settings.is_empty());

        let mut raw = PropertyDefinition::typed(ScalarType::String).with_required(true);
        raw.settings.insert("type".to_string(), json!("number"));
        raw.settings.insert("required".to_string(), json!(false));
        raw.settings.insert("format".to_string(), json!("uuid"));

        let text = serde_json::to_string(&raw).unwrap();
        assert_eq!(text.matches("\"type\"").count(), 1);
        assert_eq!(text.matches("\"required\"").count(), 1);
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"type": "string", "required": true, "format": "uuid"})
        );
    }
}
