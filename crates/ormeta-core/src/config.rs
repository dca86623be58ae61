//! Registry configuration.

use serde_json::{Map, Value};

/// Registry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Fill missing property types from the entity's member shapes.
    pub infer_missing_types: bool,

    /// Reject array declarations on members not declared as sequences.
    pub validate_array_shape: bool,

    /// Settings applied to every model, under its own settings.
    pub default_settings: Map<String, Value>,
}

impl RegistryConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            infer_missing_types: true,
            validate_array_shape: true,
            default_settings: Map::new(),
        }
    }

    /// Enable or disable type inference.
    pub fn with_type_inference(mut self, enabled: bool) -> Self {
        self.infer_missing_types = enabled;
        self
    }

    /// Enable or disable the array shape check.
    pub fn with_array_shape_validation(mut self, enabled: bool) -> Self {
        self.validate_array_shape = enabled;
        self
    }

    /// Add a default model setting.
    pub fn with_default_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_settings.insert(key.into(), value.into());
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
