//! Value parser and emitter.
//!
//! Binds generic objects to registered entities and back. Each property is
//! converted according to the content type declared on the entity, never
//! the shape of the payload on the wire; the payload shape is only checked
//! for agreement.

use crate::bound::{AnyEntity, BoundRef, BoundValue, EntityRef, FieldKind, Scalar};
use crate::cache::PropertyCache;
use crate::config::BinderConfig;
use crate::converters;
use crate::descriptor::{EntityDescriptor, PropertyDescriptor};
use crate::entity::Entity;
use crate::error::{ValueError, ValueResult};
use crate::registry::TypeRegistry;
use flowsdk_api::{ContentType, MObject, Property, PropertyValue};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, trace};

/// Converts between [`MObject`]s and registered entities.
///
/// Holds no per-call state beyond the property cache, so one parser can be
/// shared across request threads.
#[derive(Debug)]
pub struct ValueParser {
    registry: Arc<TypeRegistry>,
    cache: PropertyCache,
    config: BinderConfig,
}

impl ValueParser {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, BinderConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: BinderConfig) -> Self {
        Self {
            registry,
            cache: PropertyCache::new(),
            config,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &PropertyCache {
        &self.cache
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    // ================================================================
    // Parsing
    // ================================================================

    /// Parses a single object into `E`.
    pub fn from_object<E: Entity>(&self, object: &MObject) -> ValueResult<E> {
        let entity = EntityRef::of::<E>();
        let instance = self.parse_object(entity, object, 0)?;
        self.downcast(entity, instance)
    }

    /// Parses the first of `objects` into `E`.
    ///
    /// Fails with `NoObjectToParse` when `objects` is absent or empty.
    pub fn from_objects<E: Entity>(&self, objects: Option<&[MObject]>) -> ValueResult<E> {
        match objects.and_then(<[MObject]>::first) {
            Some(object) => self.from_object(object),
            None => Err(ValueError::NoObjectToParse {
                entity: self.registry.find_by_type::<E>()?.name().to_string(),
            }),
        }
    }

    /// Parses every object into `E`, keeping wire order. An absent list
    /// yields an empty collection.
    pub fn from_list<E: Entity>(&self, objects: Option<&[MObject]>) -> ValueResult<Vec<E>> {
        objects
            .unwrap_or_default()
            .iter()
            .map(|object| self.from_object(object))
            .collect()
    }

    fn downcast<E: Entity>(&self, entity: EntityRef, instance: AnyEntity) -> ValueResult<E> {
        match instance.downcast::<E>() {
            Ok(instance) => Ok(*instance),
            Err(_) => {
                let descriptor = self.registry.find_by_ref(entity)?;
                Err(descriptor.access_denied(descriptor.identifier()))
            }
        }
    }

    fn parse_object(
        &self,
        entity: EntityRef,
        object: &MObject,
        depth: usize,
    ) -> ValueResult<AnyEntity> {
        let descriptor = self.registry.find_by_ref(entity)?;
        self.check_depth(descriptor, depth)?;

        let mut instance = descriptor.instantiate()?;

        let identifier = descriptor.identifier();
        let external_id = BoundValue::Scalar(Scalar::Text(object.external_id.clone()));
        if !identifier.assign(&mut *instance, external_id) {
            return Err(descriptor.access_denied(identifier));
        }

        let properties = self.cache.properties(&self.registry, entity)?;
        for property in &object.properties {
            let Some(declared) = properties.get(&property.developer_name) else {
                trace!(
                    entity = %descriptor.name(),
                    property = %property.developer_name,
                    "Ignoring undeclared property"
                );
                continue;
            };
            self.populate(descriptor, &mut *instance, declared, &property.value, depth)?;
        }

        Ok(instance)
    }

    fn populate(
        &self,
        descriptor: &EntityDescriptor,
        instance: &mut (dyn Any + Send + Sync),
        property: &PropertyDescriptor,
        value: &PropertyValue,
        depth: usize,
    ) -> ValueResult<()> {
        let bound = match property.content_type() {
            ContentType::Object => self.parse_nested_object(property, value, depth)?,
            ContentType::List => self.parse_nested_list(property, value, depth)?,
            _ => match self.parse_scalar(property, value)? {
                Some(scalar) => BoundValue::Scalar(scalar),
                None => return Ok(()),
            },
        };

        if property.field().assign(instance, bound) {
            Ok(())
        } else {
            Err(descriptor.access_denied(property.field()))
        }
    }

    fn parse_scalar(
        &self,
        property: &PropertyDescriptor,
        value: &PropertyValue,
    ) -> ValueResult<Option<Scalar>> {
        converters::ensure_supported(property)?;
        let raw = match value {
            PropertyValue::Content(raw) => raw.as_str(),
            PropertyValue::Null => {
                debug!(
                    entity = property.entity(),
                    property = property.developer_name(),
                    "Skipping property with no payload"
                );
                return Ok(None);
            }
            PropertyValue::Objects(_) => return Err(payload_mismatch(property, "nested object")),
        };

        if self.config.strict_booleans
            && property.content_type() == ContentType::Boolean
            && !converters::is_boolean_literal(raw)
        {
            return Err(converters::malformed(property, raw, "expected true or false"));
        }

        let scalar = converters::convert(property, raw)?;
        if scalar.is_none() {
            debug!(
                entity = property.entity(),
                property = property.developer_name(),
                content_type = %property.content_type(),
                "Skipping empty value"
            );
        }
        Ok(scalar)
    }

    fn parse_nested_object(
        &self,
        property: &PropertyDescriptor,
        value: &PropertyValue,
        depth: usize,
    ) -> ValueResult<BoundValue> {
        let FieldKind::Entity(nested) = property.field().kind() else {
            return Err(converters::mismatch(property));
        };

        let objects = match nested_payload(property, value)? {
            Some(objects) => objects,
            None => return Ok(BoundValue::Object(None)),
        };

        let Some(first) = objects.first() else {
            return Err(ValueError::NoObjectToParse {
                entity: self.registry.find_by_ref(nested)?.name().to_string(),
            });
        };

        self.parse_object(nested, first, depth + 1)
            .map(|instance| BoundValue::Object(Some(instance)))
            .map_err(|source| nest(property, None, depth + 1, source))
    }

    fn parse_nested_list(
        &self,
        property: &PropertyDescriptor,
        value: &PropertyValue,
        depth: usize,
    ) -> ValueResult<BoundValue> {
        let FieldKind::List(nested) = property.field().kind() else {
            return Err(converters::mismatch(property));
        };

        let Some(objects) = nested_payload(property, value)? else {
            return Ok(BoundValue::List(Vec::new()));
        };

        objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                self.parse_object(nested, object, depth + 1)
                    .map_err(|source| nest(property, Some(index), depth + 1, source))
            })
            .collect::<ValueResult<Vec<_>>>()
            .map(BoundValue::List)
    }

    // ================================================================
    // Emitting
    // ================================================================

    /// Flattens an entity into a generic object.
    pub fn to_object<E: Entity>(&self, entity: &E) -> ValueResult<MObject> {
        self.emit_object(EntityRef::of::<E>(), entity, 0)
    }

    /// Flattens each entity, keeping order.
    pub fn to_objects<E: Entity>(&self, entities: &[E]) -> ValueResult<Vec<MObject>> {
        entities.iter().map(|entity| self.to_object(entity)).collect()
    }

    fn emit_object(
        &self,
        entity: EntityRef,
        instance: &(dyn Any + Send + Sync),
        depth: usize,
    ) -> ValueResult<MObject> {
        let descriptor = self.registry.find_by_ref(entity)?;
        self.check_depth(descriptor, depth)?;

        let identifier = descriptor.identifier();
        let external_id = match identifier.read(instance) {
            Some(BoundRef::Scalar(Some(Scalar::Text(external_id)))) => external_id,
            _ => return Err(descriptor.access_denied(identifier)),
        };

        let mut object = MObject::new(descriptor.name(), external_id);
        for property in descriptor.properties().values() {
            let current = property
                .field()
                .read(instance)
                .ok_or_else(|| descriptor.access_denied(property.field()))?;
            let value = self.emit_value(property, current, depth)?;
            object.properties.push(Property {
                developer_name: property.developer_name().to_string(),
                value,
            });
        }

        Ok(object)
    }

    fn emit_value(
        &self,
        property: &PropertyDescriptor,
        current: BoundRef<'_>,
        depth: usize,
    ) -> ValueResult<PropertyValue> {
        match (property.content_type(), property.field().kind(), current) {
            (ContentType::Object, FieldKind::Entity(_), BoundRef::Object(None)) => {
                Ok(PropertyValue::Null)
            }
            (ContentType::Object, FieldKind::Entity(nested), BoundRef::Object(Some(instance))) => {
                self.emit_object(nested, instance, depth + 1)
                    .map(|object| PropertyValue::Objects(vec![object]))
                    .map_err(|source| nest(property, None, depth + 1, source))
            }
            (ContentType::List, FieldKind::List(nested), BoundRef::List(instances)) => instances
                .into_iter()
                .enumerate()
                .map(|(index, instance)| {
                    self.emit_object(nested, instance, depth + 1)
                        .map_err(|source| nest(property, Some(index), depth + 1, source))
                })
                .collect::<ValueResult<Vec<_>>>()
                .map(PropertyValue::Objects),
            (content_type, _, BoundRef::Scalar(scalar)) if !content_type.is_nested() => {
                converters::render(property, scalar)
            }
            _ => Err(converters::mismatch(property)),
        }
    }

    fn check_depth(&self, descriptor: &EntityDescriptor, depth: usize) -> ValueResult<()> {
        if depth > self.config.max_depth {
            return Err(ValueError::DepthExceeded {
                entity: descriptor.name().to_string(),
                max_depth: self.config.max_depth,
            });
        }
        Ok(())
    }
}

/// Reads the nested objects for an `Object` or `List` property. `None`
/// means the property carries no objects at all.
fn nested_payload<'a>(
    property: &PropertyDescriptor,
    value: &'a PropertyValue,
) -> ValueResult<Option<&'a [MObject]>> {
    match value {
        PropertyValue::Objects(objects) => Ok(Some(objects)),
        PropertyValue::Null => Ok(None),
        PropertyValue::Content(content) if content.is_empty() => Ok(None),
        PropertyValue::Content(_) => Err(payload_mismatch(property, "scalar content")),
    }
}

fn payload_mismatch(property: &PropertyDescriptor, found: &'static str) -> ValueError {
    ValueError::PayloadMismatch {
        entity: property.entity().to_string(),
        property: property.developer_name().to_string(),
        content_type: property.content_type(),
        found,
    }
}

fn nest(
    property: &PropertyDescriptor,
    index: Option<usize>,
    depth: usize,
    source: ValueError,
) -> ValueError {
    ValueError::Nested {
        entity: property.entity().to_string(),
        property: property.developer_name().to_string(),
        index,
        depth,
        source: Box::new(source),
    }
}
