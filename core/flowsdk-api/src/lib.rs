//! Wire data model for flow services.
//!
//! This crate defines the loosely-typed shapes the host platform exchanges
//! with a service:
//! - [`ContentType`]: how a property's value is encoded on the wire
//! - [`MObject`]: an object instance: external id plus a property list
//! - [`Property`] / [`PropertyValue`]: a named slot holding either a scalar
//!   content value or nested objects
//! - [`User`]: the run-request user element passed through to services
//!
//! Binding these shapes to strongly-typed entities lives in `flowsdk-values`.

mod content_type;
mod object;
mod user;

pub use content_type::ContentType;
pub use object::{MObject, Property, PropertyValue};
pub use user::User;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading wire values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown content type: {0}")]
    UnknownContentType(String),
}
