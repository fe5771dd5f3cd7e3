//! Entity declarations.
//!
//! An entity is a plain Rust struct the host wants to receive instead of a
//! generic [`MObject`](flowsdk_api::MObject). It describes itself once, via
//! [`Entity::declare`]: a logical name, the field holding the external id,
//! and the fields backing each wire property.
//!
//! ```
//! use flowsdk_values::{field, ContentType, Entity, EntityDeclaration};
//!
//! #[derive(Default)]
//! struct Person {
//!     id: String,
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! impl Entity for Person {
//!     fn declare() -> EntityDeclaration<Self> {
//!         EntityDeclaration::new("Person")
//!             .identifier(field!(Person, id))
//!             .property("Name", ContentType::String, field!(Person, name))
//!             .property("Age", ContentType::Number, field!(Person, age))
//!     }
//! }
//! ```

use crate::bound::{AnyEntity, FieldType};
use crate::descriptor::{FieldDescriptor, TypedField};
use flowsdk_api::ContentType;
use std::any::Any;

/// A domain type that can be bound to and from generic objects.
pub trait Entity: Any + Send + Sync + Sized {
    /// Describes how this type maps onto a generic object.
    fn declare() -> EntityDeclaration<Self>;
}

/// A named pair of accessors for one field of `E`.
///
/// Usually built with the [`field!`](crate::field) macro, which captures the
/// field name for diagnostics.
pub struct Accessor<E, T> {
    name: &'static str,
    get: fn(&E) -> &T,
    get_mut: fn(&mut E) -> &mut T,
}

impl<E, T> Accessor<E, T> {
    pub const fn new(name: &'static str, get: fn(&E) -> &T, get_mut: fn(&mut E) -> &mut T) -> Self {
        Self { name, get, get_mut }
    }

    /// Returns the field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'a>(&self, entity: &'a E) -> &'a T {
        (self.get)(entity)
    }

    pub fn get_mut<'a>(&self, entity: &'a mut E) -> &'a mut T {
        (self.get_mut)(entity)
    }
}

impl<E, T> Clone for Accessor<E, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, T> Copy for Accessor<E, T> {}

/// Builds an [`Accessor`] for a named struct field.
///
/// ```ignore
/// field!(Person, name)
/// ```
#[macro_export]
macro_rules! field {
    ($entity:ty, $field:ident) => {
        $crate::Accessor::<$entity, _>::new(
            ::core::stringify!($field),
            |entity: &$entity| &entity.$field,
            |entity: &mut $entity| &mut entity.$field,
        )
    };
}

/// The declared shape of an entity, consumed by the type registry.
pub struct EntityDeclaration<E> {
    pub(crate) name: String,
    pub(crate) constructor: Option<fn() -> E>,
    pub(crate) identifiers: Vec<FieldDescriptor>,
    pub(crate) properties: Vec<PropertyDeclaration>,
}

pub(crate) struct PropertyDeclaration {
    pub(crate) developer_name: String,
    pub(crate) content_type: ContentType,
    pub(crate) field: FieldDescriptor,
}

impl<E: Entity + Default> EntityDeclaration<E> {
    /// Starts a declaration that instantiates `E` through `Default`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::without_constructor(name).constructor(E::default)
    }
}

impl<E: Entity> EntityDeclaration<E> {
    /// Starts a declaration with no constructor. Such entities can be
    /// emitted but parsing into them fails with `MissingDefaultConstructor`.
    pub fn without_constructor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            identifiers: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Sets the zero-argument constructor used when parsing.
    #[must_use]
    pub fn constructor(mut self, constructor: fn() -> E) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Marks the field that receives the object's external id.
    #[must_use]
    pub fn identifier(mut self, accessor: Accessor<E, String>) -> Self {
        self.identifiers
            .push(FieldDescriptor::new(TypedField::new(accessor)));
        self
    }

    /// Binds a wire property to a field.
    #[must_use]
    pub fn property<T: FieldType>(
        mut self,
        developer_name: impl Into<String>,
        content_type: ContentType,
        accessor: Accessor<E, T>,
    ) -> Self {
        self.properties.push(PropertyDeclaration {
            developer_name: developer_name.into(),
            content_type,
            field: FieldDescriptor::new(TypedField::new(accessor)),
        });
        self
    }

    /// Returns the logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn erased_constructor(&self) -> Option<Box<dyn Fn() -> AnyEntity + Send + Sync>> {
        self.constructor.map(|constructor| {
            Box::new(move || Box::new(constructor()) as AnyEntity)
                as Box<dyn Fn() -> AnyEntity + Send + Sync>
        })
    }
}
