//! Extracts request bodies into input schemas that only accept known fields.
//!
//! Input schemas are structs marked with `#[serde(deny_unknown_fields)]` whose
//! fields are all `Option<Value>`. Deserialization can then only fail because
//! of an unknown field or a malformed body, and each field's content is
//! checked afterwards by the validation rules of the resource.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A request body deserialized into the input schema `T`.
#[derive(Debug)]
pub struct Fields<T>(pub T);

/// Why a request body could not be turned into an input schema.
#[derive(Debug, PartialEq)]
pub enum FieldsRejection {
    /// The body contained a field that the schema does not know about.
    UnknownField(String),
    /// The body was not a JSON object or could not be read.
    Malformed(String),
}

impl IntoResponse for FieldsRejection {
    fn into_response(self) -> Response {
        match self {
            FieldsRejection::UnknownField(message) => (StatusCode::NOT_FOUND, message),
            FieldsRejection::Malformed(message) => (StatusCode::BAD_REQUEST, message),
        }
        .into_response()
    }
}

impl<T, S> FromRequest<S> for Fields<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FieldsRejection;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| FieldsRejection::Malformed(rejection.body_text()))?;

        parse_fields(&bytes).map(Fields)
    }
}

/// Deserialize `body` into the input schema `T`.
///
/// An empty body is treated as an empty object so that the validation rules
/// can report which field is missing.
///
/// # Errors
/// Returns [FieldsRejection::UnknownField] if the body has a field that `T`
/// does not declare, otherwise [FieldsRejection::Malformed] if the body is not
/// a JSON object.
pub fn parse_fields<T: DeserializeOwned>(body: &[u8]) -> Result<T, FieldsRejection> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    let value: Value = serde_json::from_slice(body)
        .map_err(|error| FieldsRejection::Malformed(error.to_string()))?;

    if !value.is_object() {
        return Err(FieldsRejection::Malformed(
            "expected a JSON object".to_owned(),
        ));
    }

    serde_json::from_value(value).map_err(|error| {
        let message = error.to_string();

        if error.is_data() && message.starts_with("unknown field") {
            FieldsRejection::UnknownField(message)
        } else {
            FieldsRejection::Malformed(message)
        }
    })
}

/// Get the text of a raw field the way a form would have submitted it.
///
/// Missing and `null` fields are empty, numbers are written out in full.
/// Returns `None` for booleans, arrays and objects, which have no text form.
pub fn field_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(_) | Value::Array(_) | Value::Object(_)) => None,
    }
}

/// Parse a decimal number that may use a comma as the decimal separator.
///
/// Every comma is replaced with a dot before parsing, so "10,5" is 10.5 and
/// "1,000.5" is rejected.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
