//! Generic objects and their properties.
//!
//! An [`MObject`] is the untyped carrier of an entity instance. Objects are
//! built once per request and not mutated afterwards; binding them to typed
//! entities is done by the value parser in `flowsdk-values`.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Wire representation of an instance of a domain entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MObject {
    /// Logical entity name, matching a registered entity.
    pub developer_name: String,
    /// Host-assigned identifier, carried verbatim.
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl MObject {
    /// Creates an object with no properties.
    pub fn new(developer_name: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            developer_name: developer_name.into(),
            external_id: external_id.into(),
            properties: Vec::new(),
        }
    }

    /// Appends a property, keeping wire order.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Returns the property with the given developer name.
    ///
    /// When the name occurs more than once the last occurrence is returned,
    /// matching the assignment order used when binding.
    pub fn property(&self, developer_name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.developer_name == developer_name)
    }

    /// Decodes an object from the host's JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the object in the host's JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a list of objects, as carried by list values and responses.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A named, content-typed slot on an [`MObject`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireProperty", into = "WireProperty")]
pub struct Property {
    pub developer_name: String,
    pub value: PropertyValue,
}

impl Property {
    /// Creates a property holding a scalar content value.
    pub fn content(developer_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            developer_name: developer_name.into(),
            value: PropertyValue::Content(value.into()),
        }
    }

    /// Creates a property holding nested objects.
    pub fn objects(developer_name: impl Into<String>, objects: Vec<MObject>) -> Self {
        Self {
            developer_name: developer_name.into(),
            value: PropertyValue::Objects(objects),
        }
    }

    /// Creates a property with no payload.
    pub fn null(developer_name: impl Into<String>) -> Self {
        Self {
            developer_name: developer_name.into(),
            value: PropertyValue::Null,
        }
    }
}

/// Payload of a [`Property`].
///
/// Scalar content types (`String`, `Number`, ...) carry `Content`; `Object`
/// and `List` carry `Objects`. `Null` means the wire held neither.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Content(String),
    /// Nested objects. May be explicitly empty, which is distinct from `Null`.
    Objects(Vec<MObject>),
    Null,
}

impl PropertyValue {
    /// Returns the scalar content, if any.
    pub fn as_content(&self) -> Option<&str> {
        match self {
            PropertyValue::Content(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested objects, if any.
    pub fn as_objects(&self) -> Option<&[MObject]> {
        match self {
            PropertyValue::Objects(objects) => Some(objects),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

// The host sends `contentValue` and `objectData` side by side; at most one is
// meaningful for a given property.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProperty {
    developer_name: String,
    #[serde(default)]
    content_value: Option<String>,
    #[serde(default)]
    object_data: Option<Vec<MObject>>,
}

impl From<WireProperty> for Property {
    fn from(wire: WireProperty) -> Self {
        let value = match (wire.object_data, wire.content_value) {
            (Some(objects), _) => PropertyValue::Objects(objects),
            (None, Some(content)) => PropertyValue::Content(content),
            (None, None) => PropertyValue::Null,
        };

        Self {
            developer_name: wire.developer_name,
            value,
        }
    }
}

impl From<Property> for WireProperty {
    fn from(property: Property) -> Self {
        let (content_value, object_data) = match property.value {
            PropertyValue::Content(content) => (Some(content), None),
            PropertyValue::Objects(objects) => (None, Some(objects)),
            PropertyValue::Null => (None, None),
        };

        Self {
            developer_name: property.developer_name,
            content_value,
            object_data,
        }
    }
}
