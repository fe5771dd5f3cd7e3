//! Value binding for flow services.
//!
//! Converts the host platform's generic objects ([`MObject`]) into
//! strongly-typed entities and back:
//! - [`Entity`] / [`EntityDeclaration`]: how a Rust type declares its logical
//!   name, identifier field and property bindings
//! - [`TypeRegistry`]: validated descriptors for every declared entity,
//!   built once at startup
//! - [`PropertyCache`]: per-type developer-name lookups for the parser
//! - [`converters`]: the content type ↔ field type compatibility matrix and
//!   the scalar conversions it allows
//! - [`ValueParser`]: parses objects into entities and emits entities as
//!   objects, recursing through nested objects and lists
//!
//! # Example
//!
//! ```
//! use flowsdk_values::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     id: String,
//!     name: String,
//!     age: Option<i32>,
//!     active: bool,
//! }
//!
//! impl Entity for Person {
//!     fn declare() -> EntityDeclaration<Self> {
//!         EntityDeclaration::new("Person")
//!             .identifier(field!(Person, id))
//!             .property("Name", ContentType::String, field!(Person, name))
//!             .property("Age", ContentType::Number, field!(Person, age))
//!             .property("Active", ContentType::Boolean, field!(Person, active))
//!     }
//! }
//!
//! let registry = TypeRegistry::builder().register::<Person>().build().unwrap();
//! let parser = ValueParser::new(Arc::new(registry));
//!
//! let object = MObject::new("Person", "p1")
//!     .with_property(Property::content("Name", "Ada"))
//!     .with_property(Property::content("Age", "37"))
//!     .with_property(Property::content("Active", "true"));
//!
//! let person: Person = parser.from_object(&object).unwrap();
//! assert_eq!(person.age, Some(37));
//! assert_eq!(parser.to_object(&person).unwrap().external_id, "p1");
//! ```

mod bound;
mod cache;
mod config;
pub mod converters;
mod descriptor;
mod entity;
mod error;
mod parser;
pub mod prelude;
mod registry;

pub use bound::{AnyEntity, BoundRef, BoundValue, EntityRef, FieldKind, FieldType, Scalar};
pub use cache::PropertyCache;
pub use config::{BinderConfig, DEFAULT_MAX_DEPTH};
pub use descriptor::{EntityDescriptor, FieldDescriptor, PropertyDescriptor, PropertyMap};
pub use entity::{Accessor, Entity, EntityDeclaration};
pub use error::{ValueError, ValueResult};
pub use flowsdk_api::{ContentType, MObject, Property, PropertyValue};
pub use parser::ValueParser;
pub use registry::{TypeRegistry, TypeRegistryBuilder};
