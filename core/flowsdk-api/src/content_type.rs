//! Content types understood by the host platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a property's value is encoded on the wire.
///
/// The serialized form matches the host's names (`ContentString`,
/// `ContentNumber`, ...), so a `ContentType` can be read straight out of a
/// type element or property payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "ContentBoolean")]
    Boolean,
    /// Free text, usually rich content.
    #[serde(rename = "ContentContent")]
    Content,
    /// ISO-8601 date-time with an explicit offset.
    #[serde(rename = "ContentDateTime")]
    DateTime,
    /// Opaque string the host stores encrypted.
    #[serde(rename = "ContentEncrypted")]
    Encrypted,
    /// Collection of nested objects.
    #[serde(rename = "ContentList")]
    List,
    #[serde(rename = "ContentNumber")]
    Number,
    /// A single nested object.
    #[serde(rename = "ContentObject")]
    Object,
    /// Opaque string the host never displays.
    #[serde(rename = "ContentPassword")]
    Password,
    #[serde(rename = "ContentString")]
    String,
}

impl ContentType {
    /// Every content type, in declaration order.
    pub const ALL: [ContentType; 9] = [
        ContentType::Boolean,
        ContentType::Content,
        ContentType::DateTime,
        ContentType::Encrypted,
        ContentType::List,
        ContentType::Number,
        ContentType::Object,
        ContentType::Password,
        ContentType::String,
    ];

    /// Returns the host's wire name for this content type.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            ContentType::Boolean => "ContentBoolean",
            ContentType::Content => "ContentContent",
            ContentType::DateTime => "ContentDateTime",
            ContentType::Encrypted => "ContentEncrypted",
            ContentType::List => "ContentList",
            ContentType::Number => "ContentNumber",
            ContentType::Object => "ContentObject",
            ContentType::Password => "ContentPassword",
            ContentType::String => "ContentString",
        }
    }

    /// Returns true if values of this type are carried as nested objects
    /// rather than a scalar content value.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self, ContentType::List | ContentType::Object)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ContentType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|content_type| content_type.wire_name() == s)
            .ok_or_else(|| crate::Error::UnknownContentType(s.to_string()))
    }
}
