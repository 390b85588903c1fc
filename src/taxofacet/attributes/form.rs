//! Form input coercion and submission encoding.
//!
//! The listing-creation form renders one input per [`AttributeField`] and
//! validates on the client with rules mirroring each field's `required` flag
//! and variant. These functions implement those rules, so the same checks
//! can run server-side and in tests.

use super::spec::{AttributeField, FieldVariant};
use super::value::{format_number, parse_bool, parse_number, AttrValue};
use std::collections::BTreeMap;
use thiserror::Error;

/// A single field failing validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field}: this field is required")]
    Missing { field: String },

    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: String, value: String },

    #[error("{field}: '{value}' is not one of the allowed options")]
    UnknownOption { field: String, value: String },

    #[error("{field}: '{value}' is not a yes/no value")]
    NotABoolean { field: String, value: String },
}

impl FieldError {
    pub fn field(&self) -> &str {
        match self {
            FieldError::Missing { field }
            | FieldError::NotANumber { field, .. }
            | FieldError::UnknownOption { field, .. }
            | FieldError::NotABoolean { field, .. } => field.as_str(),
        }
    }
}

/// Coerce one raw input into a typed value.
///
/// Returns `Ok(None)` for blank input; whether that is acceptable is decided
/// by [`validate_form`] from the field's `required` flag.
pub fn coerce(field: &AttributeField, raw: &str) -> Result<Option<AttrValue>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match &field.variant {
        FieldVariant::Text => Ok(Some(AttrValue::Text(trimmed.to_string()))),
        FieldVariant::Number => parse_number(trimmed)
            .map(|n| Some(AttrValue::Number(n)))
            .ok_or_else(|| FieldError::NotANumber {
                field: field.name.clone(),
                value: trimmed.to_string(),
            }),
        FieldVariant::Select { options } => options
            .iter()
            .find(|o| o.as_str() == trimmed)
            .map(|o| Some(AttrValue::Text(o.clone())))
            .ok_or_else(|| FieldError::UnknownOption {
                field: field.name.clone(),
                value: trimmed.to_string(),
            }),
        FieldVariant::Checkbox => parse_bool(trimmed)
            .map(|b| Some(AttrValue::Bool(b)))
            .ok_or_else(|| FieldError::NotABoolean {
                field: field.name.clone(),
                value: trimmed.to_string(),
            }),
    }
}

/// Validate a whole form against a schema.
///
/// Every failing field is reported, not just the first. Keys that are not in
/// the schema are ignored. An unchecked checkbox is simply `false`, so
/// checkboxes are never reported as missing.
pub fn validate_form(
    fields: &[AttributeField],
    raw: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, AttrValue>, Vec<FieldError>> {
    let mut values = BTreeMap::new();
    let mut errors = Vec::new();

    for field in fields {
        let input = raw.get(&field.name).map(String::as_str).unwrap_or("");
        match coerce(field, input) {
            Ok(Some(value)) => {
                values.insert(field.name.clone(), value);
            }
            Ok(None) if matches!(field.variant, FieldVariant::Checkbox) => {
                values.insert(field.name.clone(), AttrValue::Bool(false));
            }
            Ok(None) if field.required => errors.push(FieldError::Missing {
                field: field.name.clone(),
            }),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// Flatten typed values into the key/value pairs the submission endpoint
/// expects, in schema order.
///
/// Numbers are sent in numeric-string form and checkboxes as the literals
/// `"true"`/`"false"` (absent checkboxes as `"false"`). Values whose type
/// does not match their field are dropped.
pub fn submission_pairs(
    fields: &[AttributeField],
    values: &BTreeMap<String, AttrValue>,
) -> Vec<(String, String)> {
    fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.name);
            let encoded = match (&field.variant, value) {
                (FieldVariant::Checkbox, None) => "false".to_string(),
                (FieldVariant::Checkbox, Some(AttrValue::Bool(b))) => b.to_string(),
                (FieldVariant::Number, Some(AttrValue::Number(n))) => format_number(*n),
                (FieldVariant::Text | FieldVariant::Select { .. }, Some(AttrValue::Text(s))) => {
                    s.clone()
                }
                _ => return None,
            };
            Some((field.name.clone(), encoded))
        })
        .collect()
}
