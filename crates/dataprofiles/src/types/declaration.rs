//! Helpers for reading raw declaration mappings.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::constants::{CATEGORIES_KEY, CATEGORY_KEY, IDENTIFIER_KEY};

/// A decoded declaration: string keys mapped to generic values.
///
/// This is the shape the document front-end produces for the whole document
/// and for every item of the `datasources` and `credentials` sections.
pub type Declaration = Map<String, Value>;

/// Keys every declaration may carry regardless of its category.
const ENVELOPE_KEYS: &[&str] = &[IDENTIFIER_KEY, CATEGORY_KEY, CATEGORIES_KEY];

/// Outcome of reading the `identifier` member of a declaration.
pub(crate) enum IdentifierField<'a> {
    Present(&'a str),
    Missing,
    Invalid,
}

pub(crate) fn identifier_field(declaration: &Declaration) -> IdentifierField<'_> {
    match declaration.get(IDENTIFIER_KEY) {
        None | Some(Value::Null) => IdentifierField::Missing,
        Some(Value::String(identifier)) if !identifier.trim().is_empty() => {
            IdentifierField::Present(identifier)
        }
        Some(_) => IdentifierField::Invalid,
    }
}

/// Decode a declaration into a typed shape.
///
/// Unknown keys are ignored by the target types; the returned message is the
/// deserializer's description of the first missing or mistyped field.
pub(crate) fn decode<T: DeserializeOwned>(declaration: &Declaration) -> Result<T, String> {
    serde_json::from_value(Value::Object(declaration.clone())).map_err(|e| e.to_string())
}

/// Keys of `declaration` that are neither envelope keys nor in `known`.
pub(crate) fn unrecognized_fields<'a>(
    declaration: &'a Declaration,
    known: &[&str],
) -> Vec<&'a str> {
    declaration
        .keys()
        .map(String::as_str)
        .filter(|key| !ENVELOPE_KEYS.contains(key) && !known.contains(key))
        .collect()
}

/// Render a JSON value for a diagnostic without dumping nested content.
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    }
}
