//! Convenience re-exports for service authors.
//!
//! ```ignore
//! use flowsdk_values::prelude::*;
//! ```

pub use crate::field;
pub use crate::{
    BinderConfig, ContentType, Entity, EntityDeclaration, MObject, Property, PropertyValue,
    TypeRegistry, ValueError, ValueParser, ValueResult,
};
