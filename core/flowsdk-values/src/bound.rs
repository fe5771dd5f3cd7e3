//! Runtime field types and the carriers values travel in.
//!
//! The engine never sees an entity's concrete field types. Each declared
//! field reports a [`FieldKind`], receives parsed values as a [`BoundValue`]
//! and hands its current value out as a [`BoundRef`]. [`FieldType`] is the
//! bridge, implemented for every Rust type that may back a property.

use crate::entity::Entity;
use chrono::{DateTime, FixedOffset, Utc};
use std::any::{Any, TypeId};

/// A type-erased entity instance.
pub type AnyEntity = Box<dyn Any + Send + Sync>;

/// Identifies an entity type without naming it statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    type_id: TypeId,
    type_name: &'static str,
}

impl EntityRef {
    /// Returns the reference for entity type `E`.
    #[must_use]
    pub fn of<E: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the Rust type name, for diagnostics only.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// The runtime shape of a field, as far as content-type compatibility is
/// concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    String,
    DateTime,
    Double,
    Float,
    Integer,
    Long,
    Short,
    /// A single nested entity.
    Entity(EntityRef),
    /// A collection of nested entities.
    List(EntityRef),
}

impl FieldKind {
    /// Returns true for the numeric kinds.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(
            self,
            FieldKind::Double
                | FieldKind::Float
                | FieldKind::Integer
                | FieldKind::Long
                | FieldKind::Short
        )
    }

    /// Returns the referenced entity type for nested kinds.
    #[must_use]
    pub const fn entity(&self) -> Option<EntityRef> {
        match self {
            FieldKind::Entity(entity) | FieldKind::List(entity) => Some(*entity),
            _ => None,
        }
    }
}

/// A converted scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Text(String),
    DateTime(DateTime<FixedOffset>),
    Double(f64),
    Float(f32),
    Integer(i32),
    Long(i64),
    Short(i16),
}

/// An owned value on its way into an entity field.
#[derive(Debug)]
pub enum BoundValue {
    Scalar(Scalar),
    Object(Option<AnyEntity>),
    List(Vec<AnyEntity>),
}

/// A field's current value on its way out of an entity.
#[derive(Debug)]
pub enum BoundRef<'a> {
    /// `None` when the field holds no value.
    Scalar(Option<Scalar>),
    Object(Option<&'a (dyn Any + Send + Sync)>),
    List(Vec<&'a (dyn Any + Send + Sync)>),
}

/// A Rust type that can back an entity property.
pub trait FieldType: Sized + Send + Sync + 'static {
    /// The kind checked against the property's content type.
    fn kind() -> FieldKind;

    /// Takes ownership of a parsed value. Returns `None` if the value does
    /// not have this type's shape.
    fn from_bound(value: BoundValue) -> Option<Self>;

    /// Exposes the current value for emitting.
    fn to_bound(&self) -> BoundRef<'_>;
}

impl FieldType for bool {
    fn kind() -> FieldKind {
        FieldKind::Boolean
    }

    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Scalar(Scalar::Boolean(value)) => Some(value),
            _ => None,
        }
    }

    fn to_bound(&self) -> BoundRef<'_> {
        BoundRef::Scalar(Some(Scalar::Boolean(*self)))
    }
}

// Implements `FieldType` for a scalar type and its `Option` form. The
// optional form reports an absent value on emit.
macro_rules! scalar_field_type {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl FieldType for $ty {
            fn kind() -> FieldKind {
                FieldKind::$kind
            }

            fn from_bound(value: BoundValue) -> Option<Self> {
                match value {
                    BoundValue::Scalar(Scalar::$variant(value)) => Some(value),
                    _ => None,
                }
            }

            fn to_bound(&self) -> BoundRef<'_> {
                BoundRef::Scalar(Some(Scalar::$variant(self.clone())))
            }
        }

        impl FieldType for Option<$ty> {
            fn kind() -> FieldKind {
                FieldKind::$kind
            }

            fn from_bound(value: BoundValue) -> Option<Self> {
                match value {
                    BoundValue::Scalar(Scalar::$variant(value)) => Some(Some(value)),
                    _ => None,
                }
            }

            fn to_bound(&self) -> BoundRef<'_> {
                BoundRef::Scalar(self.clone().map(Scalar::$variant))
            }
        }
    };
}

scalar_field_type!(String, String, Text);
scalar_field_type!(DateTime<FixedOffset>, DateTime, DateTime);
scalar_field_type!(f64, Double, Double);
scalar_field_type!(f32, Float, Float);
scalar_field_type!(i32, Integer, Integer);
scalar_field_type!(i64, Long, Long);
scalar_field_type!(i16, Short, Short);

impl FieldType for DateTime<Utc> {
    fn kind() -> FieldKind {
        FieldKind::DateTime
    }

    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Scalar(Scalar::DateTime(value)) => Some(value.with_timezone(&Utc)),
            _ => None,
        }
    }

    fn to_bound(&self) -> BoundRef<'_> {
        BoundRef::Scalar(Some(Scalar::DateTime(DateTime::<FixedOffset>::from(*self))))
    }
}

impl FieldType for Option<DateTime<Utc>> {
    fn kind() -> FieldKind {
        FieldKind::DateTime
    }

    fn from_bound(value: BoundValue) -> Option<Self> {
        DateTime::<Utc>::from_bound(value).map(Some)
    }

    fn to_bound(&self) -> BoundRef<'_> {
        BoundRef::Scalar(
            self.map(|value| Scalar::DateTime(DateTime::<FixedOffset>::from(value))),
        )
    }
}

impl<E: Entity> FieldType for Option<E> {
    fn kind() -> FieldKind {
        FieldKind::Entity(EntityRef::of::<E>())
    }

    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::Object(None) => Some(None),
            BoundValue::Object(Some(instance)) => {
                instance.downcast::<E>().ok().map(|instance| Some(*instance))
            }
            _ => None,
        }
    }

    fn to_bound(&self) -> BoundRef<'_> {
        BoundRef::Object(
            self.as_ref()
                .map(|instance| instance as &(dyn Any + Send + Sync)),
        )
    }
}

impl<E: Entity> FieldType for Vec<E> {
    fn kind() -> FieldKind {
        FieldKind::List(EntityRef::of::<E>())
    }

    fn from_bound(value: BoundValue) -> Option<Self> {
        match value {
            BoundValue::List(instances) => instances
                .into_iter()
                .map(|instance| instance.downcast::<E>().ok().map(|instance| *instance))
                .collect(),
            _ => None,
        }
    }

    fn to_bound(&self) -> BoundRef<'_> {
        BoundRef::List(
            self.iter()
                .map(|instance| instance as &(dyn Any + Send + Sync))
                .collect(),
        )
    }
}
