//! Translates stored documents into the shape sent to API clients.

use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// The name of the identifier field in stored documents.
pub const INTERNAL_ID_FIELD: &str = "_id";
/// The name of the identifier field in API responses.
pub const PUBLIC_ID_FIELD: &str = "id";

/// Rename the internal identifier field of `document` to the public one.
///
/// Documents without an internal identifier, and values that are not JSON
/// objects, are returned unchanged.
pub fn rename_internal_id(document: Value) -> Value {
    match document {
        Value::Object(mut fields) => {
            if let Some(id) = fields.remove(INTERNAL_ID_FIELD) {
                fields.insert(PUBLIC_ID_FIELD.to_owned(), id);
            }

            Value::Object(fields)
        }
        other => other,
    }
}

/// Serialize a stored document and rename its identifier field.
///
/// # Errors
/// Returns [Error::JsonSerializationError] if `document` cannot be serialized.
pub fn to_public_json<T: Serialize>(document: &T) -> Result<Value, Error> {
    Ok(rename_internal_id(serde_json::to_value(document)?))
}

/// Serialize a list of stored documents, renaming each identifier field.
///
/// # Errors
/// Returns [Error::JsonSerializationError] if any document cannot be serialized.
pub fn to_public_json_list<T: Serialize>(documents: &[T]) -> Result<Value, Error> {
    documents
        .iter()
        .map(to_public_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
