//! Error types for value binding.

use flowsdk_api::ContentType;
use thiserror::Error;

/// Result type for binding operations.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised while registering entities or binding values.
///
/// Declaration errors come out of [`TypeRegistryBuilder::build`] and are
/// fatal at startup. Everything else is raised per request and aborts the
/// whole parse or emit.
///
/// [`TypeRegistryBuilder::build`]: crate::TypeRegistryBuilder::build
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("entity '{entity}' does not declare an identifier field")]
    NoIdentifierDeclared { entity: String },

    #[error("entity '{entity}' declares more than one identifier field: {}", .fields.join(", "))]
    AmbiguousIdentifier {
        entity: String,
        fields: Vec<&'static str>,
    },

    #[error("entity name '{0}' is registered more than once")]
    DuplicateLogicalName(String),

    #[error("type {0} is registered more than once")]
    TypeAlreadyRegistered(&'static str),

    #[error("entity '{entity}' declares property '{property}' more than once")]
    DuplicateDeveloperName { entity: String, property: String },

    #[error("property '{entity}.{property}' refers to unregistered entity type {type_name}")]
    UnregisteredNestedEntity {
        entity: String,
        property: String,
        type_name: &'static str,
    },

    #[error("no entity named '{0}' is registered")]
    TypeNotFound(String),

    #[error("type {0} is not a registered entity")]
    TypeNotRegistered(&'static str),

    #[error("the type {entity} does not have a zero-argument constructor")]
    MissingDefaultConstructor { entity: String },

    #[error("unable to find an object to parse into {entity}")]
    NoObjectToParse { entity: String },

    #[error("field '{field}' of entity '{entity}' cannot be accessed through its binding")]
    FieldAccessDenied { entity: String, field: &'static str },

    #[error(
        "property '{entity}.{property}' is declared {content_type} but received a {found} payload"
    )]
    PayloadMismatch {
        entity: String,
        property: String,
        content_type: ContentType,
        found: &'static str,
    },

    #[error("entity '{entity}' exceeds the maximum nesting depth of {max_depth}")]
    DepthExceeded { entity: String, max_depth: usize },

    #[error(
        "property '{entity}.{property}' is declared {content_type} but field '{field}' has type {field_type} (expected {expected})"
    )]
    TypePropertyMismatch {
        entity: String,
        property: String,
        field: &'static str,
        field_type: &'static str,
        expected: &'static str,
        content_type: ContentType,
    },

    #[error(
        "property '{entity}.{property}' declared {content_type} cannot hold {value:?}: {reason}"
    )]
    MalformedValue {
        entity: String,
        property: String,
        content_type: ContentType,
        value: String,
        reason: String,
    },

    #[error("{entity}.{property}{} (depth {depth}): {source}", index_suffix(.index))]
    Nested {
        entity: String,
        property: String,
        index: Option<usize>,
        depth: usize,
        source: Box<ValueError>,
    },
}

impl ValueError {
    /// Returns the innermost error, looking through nested-parse wrappers.
    pub fn root_cause(&self) -> &ValueError {
        let mut current = self;
        while let ValueError::Nested { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns true for errors that can only come out of registration.
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            ValueError::NoIdentifierDeclared { .. }
                | ValueError::AmbiguousIdentifier { .. }
                | ValueError::DuplicateLogicalName(_)
                | ValueError::TypeAlreadyRegistered(_)
                | ValueError::DuplicateDeveloperName { .. }
                | ValueError::UnregisteredNestedEntity { .. }
        )
    }
}

fn index_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!("[{i}]")).unwrap_or_default()
}
