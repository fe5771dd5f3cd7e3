//! Type-erased views of declared entities.

use crate::bound::{AnyEntity, BoundRef, BoundValue, EntityRef, FieldKind, FieldType};
use crate::entity::{Accessor, Entity};
use crate::error::{ValueError, ValueResult};
use flowsdk_api::ContentType;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Developer name → property, in declaration order.
pub type PropertyMap = IndexMap<String, Arc<PropertyDescriptor>>;

/// Reads and writes one field of an entity the engine only knows as `Any`.
pub(crate) trait FieldBinding: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> FieldKind;

    fn type_name(&self) -> &'static str;

    /// Returns false if `target` is not the bound entity type or `value`
    /// does not fit the field.
    fn assign(&self, target: &mut (dyn Any + Send + Sync), value: BoundValue) -> bool;

    fn read<'a>(&self, target: &'a (dyn Any + Send + Sync)) -> Option<BoundRef<'a>>;
}

pub(crate) struct TypedField<E, T> {
    accessor: Accessor<E, T>,
}

impl<E, T> TypedField<E, T> {
    pub(crate) fn new(accessor: Accessor<E, T>) -> Self {
        Self { accessor }
    }
}

impl<E: Entity, T: FieldType> FieldBinding for TypedField<E, T> {
    fn name(&self) -> &'static str {
        self.accessor.name()
    }

    fn kind(&self) -> FieldKind {
        T::kind()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn assign(&self, target: &mut (dyn Any + Send + Sync), value: BoundValue) -> bool {
        let Some(entity) = target.downcast_mut::<E>() else {
            return false;
        };
        match T::from_bound(value) {
            Some(value) => {
                *self.accessor.get_mut(entity) = value;
                true
            }
            None => false,
        }
    }

    fn read<'a>(&self, target: &'a (dyn Any + Send + Sync)) -> Option<BoundRef<'a>> {
        target
            .downcast_ref::<E>()
            .map(|entity| self.accessor.get(entity).to_bound())
    }
}

/// A declared entity field.
pub struct FieldDescriptor {
    binding: Box<dyn FieldBinding>,
}

impl FieldDescriptor {
    pub(crate) fn new(binding: impl FieldBinding + 'static) -> Self {
        Self {
            binding: Box::new(binding),
        }
    }

    /// Returns the Rust field name.
    pub fn name(&self) -> &'static str {
        self.binding.name()
    }

    pub fn kind(&self) -> FieldKind {
        self.binding.kind()
    }

    /// Returns the Rust type name of the field.
    pub fn type_name(&self) -> &'static str {
        self.binding.type_name()
    }

    pub(crate) fn assign(&self, target: &mut (dyn Any + Send + Sync), value: BoundValue) -> bool {
        self.binding.assign(target, value)
    }

    pub(crate) fn read<'a>(&self, target: &'a (dyn Any + Send + Sync)) -> Option<BoundRef<'a>> {
        self.binding.read(target)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// A wire property bound to an entity field.
#[derive(Debug)]
pub struct PropertyDescriptor {
    pub(crate) entity: String,
    pub(crate) developer_name: String,
    pub(crate) content_type: ContentType,
    pub(crate) field: FieldDescriptor,
}

impl PropertyDescriptor {
    /// Returns the logical name of the owning entity.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn developer_name(&self) -> &str {
        &self.developer_name
    }

    /// Returns the declared content type. Fixed at registration.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }
}

/// The registry's structural view of one entity type.
pub struct EntityDescriptor {
    pub(crate) name: String,
    pub(crate) entity: EntityRef,
    pub(crate) constructor: Option<Box<dyn Fn() -> AnyEntity + Send + Sync>>,
    pub(crate) identifier: FieldDescriptor,
    pub(crate) properties: PropertyMap,
}

impl EntityDescriptor {
    /// Returns the logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_ref(&self) -> EntityRef {
        self.entity
    }

    /// Returns the field holding the external id.
    pub fn identifier(&self) -> &FieldDescriptor {
        &self.identifier
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn property(&self, developer_name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(developer_name).map(Arc::as_ref)
    }

    /// Returns true if instances can be created for parsing.
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    pub(crate) fn instantiate(&self) -> ValueResult<AnyEntity> {
        self.constructor
            .as_ref()
            .map(|constructor| constructor())
            .ok_or_else(|| ValueError::MissingDefaultConstructor {
                entity: self.name.clone(),
            })
    }

    pub(crate) fn access_denied(&self, field: &FieldDescriptor) -> ValueError {
        ValueError::FieldAccessDenied {
            entity: self.name.clone(),
            field: field.name(),
        }
    }
}

impl fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .field("entity", &self.entity)
            .field("has_constructor", &self.has_constructor())
            .field("identifier", &self.identifier)
            .field("properties", &self.properties)
            .finish()
    }
}
