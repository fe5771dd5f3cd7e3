//! The type registry.
//!
//! Built once at startup from an explicit set of entity types and read-only
//! afterwards. Every declaration problem is reported by
//! [`TypeRegistryBuilder::build`]; lookups at request time can only fail for
//! types that were never registered.

use crate::bound::EntityRef;
use crate::config::BinderConfig;
use crate::converters;
use crate::descriptor::{EntityDescriptor, FieldDescriptor, PropertyDescriptor, PropertyMap};
use crate::entity::{Entity, EntityDeclaration};
use crate::error::{ValueError, ValueResult};
use indexmap::IndexMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registered entity descriptors, keyed by logical name.
#[derive(Debug)]
pub struct TypeRegistry {
    entities: IndexMap<String, Arc<EntityDescriptor>>,
    by_type: HashMap<TypeId, String>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Returns every registered entity, in registration order.
    pub fn find_all(&self) -> impl Iterator<Item = &EntityDescriptor> + '_ {
        self.entities.values().map(Arc::as_ref)
    }

    /// Looks up an entity by logical name. Case-sensitive.
    pub fn find_by_name(&self, name: &str) -> ValueResult<&EntityDescriptor> {
        self.entities
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| ValueError::TypeNotFound(name.to_string()))
    }

    pub fn find_by_type<E: Entity>(&self) -> ValueResult<&EntityDescriptor> {
        self.find_by_ref(EntityRef::of::<E>())
    }

    pub fn find_by_ref(&self, entity: EntityRef) -> ValueResult<&EntityDescriptor> {
        self.by_type
            .get(&entity.type_id())
            .and_then(|name| self.entities.get(name))
            .map(Arc::as_ref)
            .ok_or(ValueError::TypeNotRegistered(entity.type_name()))
    }

    /// Returns the field designated as `E`'s external identifier.
    ///
    /// Identifier declarations are checked at registration, so this only
    /// fails for unregistered types.
    pub fn find_type_identifier<E: Entity>(&self) -> ValueResult<&FieldDescriptor> {
        self.find_by_type::<E>().map(EntityDescriptor::identifier)
    }

    /// Returns `E`'s properties keyed by developer name.
    pub fn find_type_properties<E: Entity>(&self) -> ValueResult<&PropertyMap> {
        self.find_by_type::<E>().map(EntityDescriptor::properties)
    }

    pub fn contains<E: Entity>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Collects entity declarations and validates them into a [`TypeRegistry`].
pub struct TypeRegistryBuilder {
    config: BinderConfig,
    pending: Vec<ValueResult<EntityDescriptor>>,
}

impl TypeRegistryBuilder {
    fn new() -> Self {
        Self {
            config: BinderConfig::default(),
            pending: Vec::new(),
        }
    }

    /// Applies registry-related settings (`validate_bindings`).
    #[must_use]
    pub fn with_config(mut self, config: &BinderConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Registers `E` using its own declaration.
    #[must_use]
    pub fn register<E: Entity>(self) -> Self {
        self.register_declaration(E::declare())
    }

    /// Registers `E` using a declaration supplied by the host.
    #[must_use]
    pub fn register_declaration<E: Entity>(mut self, declaration: EntityDeclaration<E>) -> Self {
        self.pending.push(describe(declaration));
        self
    }

    /// Validates every declaration and builds the registry.
    pub fn build(self) -> ValueResult<TypeRegistry> {
        let mut entities: IndexMap<String, Arc<EntityDescriptor>> = IndexMap::new();
        let mut by_type = HashMap::new();

        for descriptor in self.pending {
            let descriptor = descriptor?;
            if entities.contains_key(&descriptor.name) {
                return Err(ValueError::DuplicateLogicalName(descriptor.name));
            }
            if by_type.contains_key(&descriptor.entity.type_id()) {
                return Err(ValueError::TypeAlreadyRegistered(
                    descriptor.entity.type_name(),
                ));
            }

            debug!(
                entity = %descriptor.name,
                rust_type = descriptor.entity.type_name(),
                properties = descriptor.properties.len(),
                "Registered entity"
            );
            by_type.insert(descriptor.entity.type_id(), descriptor.name.clone());
            entities.insert(descriptor.name.clone(), Arc::new(descriptor));
        }

        for descriptor in entities.values() {
            for property in descriptor.properties.values() {
                if let Some(nested) = property.field.kind().entity() {
                    if !by_type.contains_key(&nested.type_id()) {
                        return Err(ValueError::UnregisteredNestedEntity {
                            entity: descriptor.name.clone(),
                            property: property.developer_name.clone(),
                            type_name: nested.type_name(),
                        });
                    }
                }
                if self.config.validate_bindings {
                    converters::ensure_supported(property)?;
                }
            }
        }

        info!(entities = entities.len(), "Type registry built");
        Ok(TypeRegistry { entities, by_type })
    }
}

/// Checks one declaration and erases it into a descriptor.
fn describe<E: Entity>(declaration: EntityDeclaration<E>) -> ValueResult<EntityDescriptor> {
    let constructor = declaration.erased_constructor();
    let EntityDeclaration {
        name,
        mut identifiers,
        properties,
        ..
    } = declaration;

    let identifier = match identifiers.len() {
        0 => return Err(ValueError::NoIdentifierDeclared { entity: name }),
        1 => identifiers.remove(0),
        _ => {
            return Err(ValueError::AmbiguousIdentifier {
                entity: name,
                fields: identifiers.iter().map(FieldDescriptor::name).collect(),
            });
        }
    };

    let mut map = PropertyMap::new();
    for property in properties {
        if map.contains_key(&property.developer_name) {
            return Err(ValueError::DuplicateDeveloperName {
                entity: name,
                property: property.developer_name,
            });
        }
        map.insert(
            property.developer_name.clone(),
            Arc::new(PropertyDescriptor {
                entity: name.clone(),
                developer_name: property.developer_name,
                content_type: property.content_type,
                field: property.field,
            }),
        );
    }

    Ok(EntityDescriptor {
        name,
        entity: EntityRef::of::<E>(),
        constructor,
        identifier,
        properties: map,
    })
}
