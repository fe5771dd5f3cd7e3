//! Scalar converters.
//!
//! One pure function per content type turns a wire string into a
//! [`Scalar`] for the property's field, and [`render`] turns a field value
//! back into a wire payload. Every function checks the (content type, field
//! kind) pair against the compatibility matrix first:
//!
//! | Content type | Field kinds |
//! |---|---|
//! | `Boolean` | `bool` |
//! | `Content`, `Encrypted`, `Password`, `String` | `String` |
//! | `DateTime` | offset date-time |
//! | `Number` | `f64`, `f32`, `i32`, `i64`, `i16` |
//! | `Object` | `Option<impl Entity>` |
//! | `List` | `Vec<impl Entity>` |
//!
//! `DateTime` and `Number` treat an empty string as "no value": the
//! converters return `None` and the field keeps whatever it held.

use crate::bound::{FieldKind, Scalar};
use crate::descriptor::PropertyDescriptor;
use crate::error::{ValueError, ValueResult};
use chrono::{DateTime, FixedOffset, ParseError};
use flowsdk_api::{ContentType, PropertyValue};
use std::borrow::Cow;
use tracing::debug;

/// Returns true if a field of `kind` can hold values of `content_type`.
pub fn supports(content_type: ContentType, kind: FieldKind) -> bool {
    match content_type {
        ContentType::Boolean => kind == FieldKind::Boolean,
        ContentType::Content
        | ContentType::Encrypted
        | ContentType::Password
        | ContentType::String => kind == FieldKind::String,
        ContentType::DateTime => kind == FieldKind::DateTime,
        ContentType::Number => kind.is_number(),
        ContentType::Object => matches!(kind, FieldKind::Entity(_)),
        ContentType::List => matches!(kind, FieldKind::List(_)),
    }
}

/// Describes the field type a content type needs, for diagnostics.
pub fn expected_type(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Boolean => "bool",
        ContentType::Content
        | ContentType::Encrypted
        | ContentType::Password
        | ContentType::String => "String",
        ContentType::DateTime => "DateTime<FixedOffset>",
        ContentType::Number => "f64, f32, i32, i64 or i16",
        ContentType::Object => "Option<impl Entity>",
        ContentType::List => "Vec<impl Entity>",
    }
}

/// Fails with `TypePropertyMismatch` unless the property's field kind is
/// compatible with its content type.
pub fn ensure_supported(property: &PropertyDescriptor) -> ValueResult<()> {
    if supports(property.content_type(), property.field().kind()) {
        Ok(())
    } else {
        Err(mismatch(property))
    }
}

pub(crate) fn mismatch(property: &PropertyDescriptor) -> ValueError {
    ValueError::TypePropertyMismatch {
        entity: property.entity().to_string(),
        property: property.developer_name().to_string(),
        field: property.field().name(),
        field_type: property.field().type_name(),
        expected: expected_type(property.content_type()),
        content_type: property.content_type(),
    }
}

pub(crate) fn malformed(
    property: &PropertyDescriptor,
    value: &str,
    reason: impl ToString,
) -> ValueError {
    ValueError::MalformedValue {
        entity: property.entity().to_string(),
        property: property.developer_name().to_string(),
        content_type: property.content_type(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Returns true for `true`/`false` in any case.
pub fn is_boolean_literal(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// `true` in any case is true; every other value is false.
pub fn to_boolean(property: &PropertyDescriptor, value: &str) -> ValueResult<bool> {
    ensure_supported(property)?;
    if !is_boolean_literal(value) {
        debug!(
            entity = property.entity(),
            property = property.developer_name(),
            value,
            "Non-boolean value read as false"
        );
    }
    Ok(value.eq_ignore_ascii_case("true"))
}

pub fn to_content(property: &PropertyDescriptor, value: &str) -> ValueResult<String> {
    verbatim(property, value)
}

pub fn to_encrypted(property: &PropertyDescriptor, value: &str) -> ValueResult<String> {
    verbatim(property, value)
}

pub fn to_password(property: &PropertyDescriptor, value: &str) -> ValueResult<String> {
    verbatim(property, value)
}

pub fn to_string(property: &PropertyDescriptor, value: &str) -> ValueResult<String> {
    verbatim(property, value)
}

fn verbatim(property: &PropertyDescriptor, value: &str) -> ValueResult<String> {
    ensure_supported(property)?;
    Ok(value.to_string())
}

/// Parses an ISO-8601 date-time with an explicit offset. Empty input
/// yields `None`.
///
/// Seconds and fractional seconds are optional, the date and time must be
/// separated by `T`, and the offset is either `Z` or `±HH:MM`.
pub fn to_date_time(
    property: &PropertyDescriptor,
    value: &str,
) -> ValueResult<Option<DateTime<FixedOffset>>> {
    ensure_supported(property)?;
    if value.is_empty() {
        return Ok(None);
    }

    parse_iso_offset(value)
        .map(Some)
        .map_err(|e| malformed(property, value, e))
}

const ISO_OFFSET_SECONDS: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const ISO_OFFSET_MINUTES: &str = "%Y-%m-%dT%H:%M%:z";

fn parse_iso_offset(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let value = match value.strip_suffix('Z') {
        Some(local) => Cow::Owned(format!("{local}+00:00")),
        None => Cow::Borrowed(value),
    };

    DateTime::parse_from_str(&value, ISO_OFFSET_SECONDS)
        .or_else(|_| DateTime::parse_from_str(&value, ISO_OFFSET_MINUTES))
}

/// Parses a number into the field's numeric kind. Empty input yields
/// `None`. Surrounding whitespace is accepted for `f64` and `f32` fields.
pub fn to_number(property: &PropertyDescriptor, value: &str) -> ValueResult<Option<Scalar>> {
    ensure_supported(property)?;
    if value.is_empty() {
        return Ok(None);
    }

    let scalar = match property.field().kind() {
        FieldKind::Double => value
            .trim()
            .parse()
            .map(Scalar::Double)
            .map_err(|e| malformed(property, value, e)),
        FieldKind::Float => value
            .trim()
            .parse()
            .map(Scalar::Float)
            .map_err(|e| malformed(property, value, e)),
        FieldKind::Integer => value
            .parse()
            .map(Scalar::Integer)
            .map_err(|e| malformed(property, value, e)),
        FieldKind::Long => value
            .parse()
            .map(Scalar::Long)
            .map_err(|e| malformed(property, value, e)),
        FieldKind::Short => value
            .parse()
            .map(Scalar::Short)
            .map_err(|e| malformed(property, value, e)),
        _ => Err(mismatch(property)),
    }?;
    Ok(Some(scalar))
}

/// Converts a wire string for `property`, dispatching on its declared
/// content type. `None` means the field should be left untouched.
pub fn convert(property: &PropertyDescriptor, value: &str) -> ValueResult<Option<Scalar>> {
    match property.content_type() {
        ContentType::Boolean => to_boolean(property, value).map(|v| Some(Scalar::Boolean(v))),
        ContentType::Content => to_content(property, value).map(|v| Some(Scalar::Text(v))),
        ContentType::DateTime => to_date_time(property, value).map(|v| v.map(Scalar::DateTime)),
        ContentType::Encrypted => to_encrypted(property, value).map(|v| Some(Scalar::Text(v))),
        ContentType::Number => to_number(property, value),
        ContentType::Password => to_password(property, value).map(|v| Some(Scalar::Text(v))),
        ContentType::String => to_string(property, value).map(|v| Some(Scalar::Text(v))),
        ContentType::Object | ContentType::List => Err(mismatch(property)),
    }
}

/// Renders a field value as a wire payload for `property`.
///
/// An absent date-time or number renders as empty content; an absent
/// string renders as `Null`.
pub fn render(property: &PropertyDescriptor, value: Option<Scalar>) -> ValueResult<PropertyValue> {
    ensure_supported(property)?;

    let content = match value {
        None if matches!(
            property.content_type(),
            ContentType::DateTime | ContentType::Number
        ) =>
        {
            String::new()
        }
        None => return Ok(PropertyValue::Null),
        Some(Scalar::Boolean(value)) => value.to_string(),
        Some(Scalar::Text(value)) => value,
        Some(Scalar::DateTime(value)) => value.to_rfc3339(),
        Some(Scalar::Double(value)) => value.to_string(),
        Some(Scalar::Float(value)) => value.to_string(),
        Some(Scalar::Integer(value)) => value.to_string(),
        Some(Scalar::Long(value)) => value.to_string(),
        Some(Scalar::Short(value)) => value.to_string(),
    };
    Ok(PropertyValue::Content(content))
}
