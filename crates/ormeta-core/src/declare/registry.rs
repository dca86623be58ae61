//! Model registry: property registration and model assembly.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use super::builder::ModelBuilder;
use super::inference::{complete_property, infer_type, is_unresolved};
use crate::catalog::{
    DeclaredType, Entity, ModelDefinition, ModelRef, ModelSettings, PropertyDefinition,
    RelationDefinition, TypeRef, ONE_OF,
};
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::metadata::{MetadataKey, MetadataStore};

/// Property declarations, per member.
pub(crate) const PROPERTIES: MetadataKey<PropertyDefinition> =
    MetadataKey::new("ormeta:properties");

/// Relation declarations, per relation name.
pub(crate) const RELATIONS: MetadataKey<RelationDefinition> =
    MetadataKey::new("ormeta:relations");

/// Assembled model definitions, per entity.
pub(crate) const MODEL: MetadataKey<ModelDefinition> = MetadataKey::new("ormeta:model");

/// Registry of model declarations.
///
/// Member-level declarations accumulate in the registry's store until the
/// entity is declared with [`declare_model`](Self::declare_model), which
/// assembles them into a [`ModelDefinition`].
#[derive(Default)]
pub struct Registry {
    store: MetadataStore,
    config: RegistryConfig,
}

impl Registry {
    /// Create a registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            store: MetadataStore::new(),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the underlying metadata store.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Start a declaration context for `T`.
    pub fn model<T: Entity>(&self) -> ModelBuilder<'_, T> {
        ModelBuilder::new(self)
    }

    /// Declared shape of `member` on `T`.
    pub fn infer_type<T: Entity>(&self, member: &str) -> DeclaredType {
        infer_type::<T>(member)
    }

    /// Record a (partial) property definition for `member` on `T`.
    ///
    /// Repeated declarations merge field by field; later fields win.
    pub fn declare_property<T: Entity>(&self, member: &str, partial: PropertyDefinition) {
        debug!(entity = T::NAME, member, "Declaring property");
        self.store
            .merge(PROPERTIES, ModelRef::of::<T>(), Some(member), |previous| {
                previous.unwrap_or_default().merged(partial)
            });
    }

    /// Declare a union (`oneOf`) property. Requires at least two distinct
    /// alternatives; repeated references are dropped.
    pub fn declare_union_property<T: Entity>(
        &self,
        member: &str,
        refs: impl IntoIterator<Item = ModelRef>,
    ) -> Result<()> {
        let refs = distinct_refs(refs);
        if refs.len() < 2 {
            return Err(Error::invalid_argument(
                T::NAME,
                member,
                format!("union needs at least two distinct types, got {}", refs.len()),
            ));
        }

        self.declare_property::<T>(
            member,
            PropertyDefinition::typed(TypeRef::Union(refs)).with_validation_key(ONE_OF),
        );
        Ok(())
    }

    /// Declare an array of a union (`oneOf`) property.
    ///
    /// Unlike [`declare_union_property`](Self::declare_union_property), a
    /// single alternative is accepted. Repeated references are dropped.
    pub fn declare_array_union_property<T: Entity>(
        &self,
        member: &str,
        refs: impl IntoIterator<Item = ModelRef>,
    ) -> Result<()> {
        let refs = distinct_refs(refs);
        if refs.is_empty() {
            return Err(Error::invalid_argument(
                T::NAME,
                member,
                "array union needs at least one type",
            ));
        }

        self.declare_property::<T>(
            member,
            PropertyDefinition::typed(TypeRef::Union(refs))
                .with_array(true)
                .with_validation_key(ONE_OF),
        );
        Ok(())
    }

    /// Declare an array property holding `element` values.
    ///
    /// Fails if `member` is not declared as a sequence on `T`, unless the
    /// shape check is disabled in the configuration. Fields from `partial`
    /// are merged in; the element type and array flag always win.
    pub fn declare_array_property<T: Entity>(
        &self,
        member: &str,
        element: impl Into<TypeRef>,
        partial: Option<PropertyDefinition>,
    ) -> Result<()> {
        self.check_sequence_shape::<T>(member)?;

        let property = partial
            .unwrap_or_default()
            .with_type(element)
            .with_array(true);
        self.declare_property::<T>(member, property);
        Ok(())
    }

    /// Fail unless `member` is declared as a sequence on `T`. Always passes
    /// when the shape check is disabled.
    pub(crate) fn check_sequence_shape<T: Entity>(&self, member: &str) -> Result<()> {
        if !self.config.validate_array_shape {
            return Ok(());
        }
        let declared = infer_type::<T>(member);
        if declared.is_sequence() {
            return Ok(());
        }
        Err(Error::InvalidShapeMismatch {
            entity: T::NAME.to_string(),
            member: member.to_string(),
            declared: declared.to_string(),
        })
    }

    /// Property declarations recorded so far for `T`, keyed by member.
    pub fn property_definitions<T: Entity>(&self) -> BTreeMap<String, PropertyDefinition> {
        self.store.retrieve_all(PROPERTIES, ModelRef::of::<T>())
    }

    /// Assemble and attach the model definition for `T`.
    ///
    /// Includes every property and relation declared for `T` so far. Missing
    /// property types are inferred from `T`'s member shapes. Declaring a model
    /// again rebuilds the definition and replaces the previous one.
    #[instrument(skip(self, settings), fields(entity = T::NAME))]
    pub fn declare_model<T: Entity>(&self, settings: ModelSettings) -> ModelDefinition {
        let target = ModelRef::of::<T>();
        let ModelSettings { name, settings } = settings;
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(default_model_name::<T>);

        let mut model_settings = self.config.default_settings.clone();
        model_settings.extend(settings);
        let mut model = ModelDefinition::new(name).with_settings(model_settings);

        for (member, mut property) in self.store.retrieve_all(PROPERTIES, target) {
            if self.config.infer_missing_types {
                complete_property::<T>(&member, &mut property);
            }
            model.add_property(member, property);
        }

        for relation in self.store.retrieve_all(RELATIONS, target).into_values() {
            model.add_relation(relation);
        }
        self.resolve_foreign_keys(&mut model);

        info!(
            model = %model.name,
            properties = model.properties.len(),
            relations = model.relations.len(),
            "Model declared"
        );

        self.store.record(MODEL, target, None, model.clone());
        model
    }

    /// Get the model definition attached to `T`, if declared.
    pub fn model_definition<T: Entity>(&self) -> Option<ModelDefinition> {
        self.store.retrieve(MODEL, ModelRef::of::<T>(), None)
    }

    /// Mutate the model definition attached to `T` in place.
    ///
    /// `f` runs under the store's entry lock and must not call back into the
    /// registry.
    pub fn update_model<T, F>(&self, f: F) -> Result<()>
    where
        T: Entity,
        F: FnOnce(&mut ModelDefinition),
    {
        if self.store.update(MODEL, ModelRef::of::<T>(), None, f) {
            Ok(())
        } else {
            Err(Error::ModelNotDeclared(T::NAME.to_string()))
        }
    }

    /// All declared model definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ModelDefinition> {
        let mut definitions: Vec<ModelDefinition> = self
            .store
            .targets(MODEL)
            .into_iter()
            .filter_map(|target| self.store.retrieve(MODEL, target, None))
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Give foreign keys without a known type the type of the target's id,
    /// when the target model is already declared.
    fn resolve_foreign_keys(&self, model: &mut ModelDefinition) {
        let owning: Vec<RelationDefinition> = model
            .relations
            .values()
            .filter(|r| r.kind.is_owning())
            .cloned()
            .collect();

        for relation in owning {
            let Some(property) = model.properties.get_mut(&relation.key_from) else {
                continue;
            };
            if !is_unresolved(property) {
                continue;
            }
            let Some(target) = self.store.retrieve(MODEL, relation.target, None) else {
                continue;
            };
            let Some(id_type) = target
                .property(&relation.key_to)
                .and_then(|p| p.type_ref.clone())
            else {
                continue;
            };

            debug!(
                model = %model.name,
                key = %relation.key_from,
                target = %relation.target,
                "Foreign key type taken from target id"
            );
            property.type_ref = Some(id_type);
        }
    }
}

/// `T::NAME`, or the unqualified Rust type name when `NAME` is empty.
fn default_model_name<T: Entity>() -> String {
    if !T::NAME.is_empty() {
        return T::NAME.to_string();
    }
    let type_name = std::any::type_name::<T>();
    let base = type_name.split('<').next().unwrap_or(type_name);
    let fallback = base.rsplit("::").next().unwrap_or(base).to_string();
    warn!(model = %fallback, "Entity has an empty NAME, using its type name");
    fallback
}

/// Drop repeated references, keeping first occurrences in order.
fn distinct_refs(refs: impl IntoIterator<Item = ModelRef>) -> Vec<ModelRef> {
    let mut distinct: Vec<ModelRef> = Vec::new();
    for model in refs {
        if !distinct.contains(&model) {
            distinct.push(model);
        }
    }
    distinct
}
