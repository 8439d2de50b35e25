//! The errors returned by the JSON API.
//!
//! Client errors are sent as `{"error": {"name": ..., "message": ...}}`.
//! Storage failures are sent as a bare 500 response without a body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{Error, fields::FieldsRejection};

/// The collection that an API request operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// The accounts collection.
    Account,
    /// The transactions collection.
    Transaction,
}

impl Resource {
    fn prefix(self) -> &'static str {
        match self {
            Resource::Account => "Account",
            Resource::Transaction => "Transaction",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Resource::Account => "account",
            Resource::Transaction => "transaction",
        }
    }
}

/// What the client tried to do to a missing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// An update request.
    Change,
    /// A delete request.
    Delete,
}

/// An error response from the JSON API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request body contained a field that is not part of the resource.
    InvalidField(Resource),
    /// A field failed validation. Holds the message of the first failed rule.
    Validation(Resource, String),
    /// The record targeted by the request does not exist.
    Undefined(Resource, Operation),
    /// Reading from or writing to the store failed.
    Storage,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    name: String,
    message: String,
}

impl ApiError {
    /// The HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidField(_) | ApiError::Undefined(_, _) => StatusCode::NOT_FOUND,
            ApiError::Validation(_, _) => StatusCode::BAD_REQUEST,
            ApiError::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error kind sent to the client, e.g. "AccountValidationError".
    ///
    /// Returns `None` for errors that are sent without a body.
    pub fn name(&self) -> Option<String> {
        let (resource, kind) = match self {
            ApiError::InvalidField(resource) => (resource, "InvalidFieldError"),
            ApiError::Validation(resource, _) => (resource, "ValidationError"),
            ApiError::Undefined(resource, _) => (resource, "UndefinedError"),
            ApiError::Storage => return None,
        };

        Some(format!("{}{kind}", resource.prefix()))
    }

    /// The human readable message sent to the client.
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidField(resource) => format!(
                "The {} may only contain the specified fields",
                resource.noun()
            ),
            ApiError::Validation(_, message) => message.clone(),
            ApiError::Undefined(resource, Operation::Change) => {
                format!("The {} to be changed doesn't exist", resource.noun())
            }
            ApiError::Undefined(resource, Operation::Delete) => {
                format!("The {} to be deleted doesn't exist", resource.noun())
            }
            ApiError::Storage => String::new(),
        }
    }

    /// Convert a rejected request body into the error for `resource`.
    ///
    /// Unknown fields are reported as [ApiError::InvalidField], anything else
    /// as a validation error.
    pub fn from_rejection(resource: Resource, rejection: FieldsRejection) -> Self {
        match rejection {
            FieldsRejection::UnknownField(reason) => {
                tracing::debug!("Rejected {} fields: {reason}", resource.noun());
                ApiError::InvalidField(resource)
            }
            FieldsRejection::Malformed(reason) => {
                tracing::debug!("Rejected malformed {} body: {reason}", resource.noun());
                ApiError::Validation(resource, "Malformed request body".to_owned())
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        tracing::error!("An unexpected error occurred while handling an API request: {error}");
        ApiError::Storage
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        match self.name() {
            Some(name) => (
                status_code,
                Json(ErrorBody {
                    error: ErrorDetail {
                        name,
                        message: self.message(),
                    },
                }),
            )
                .into_response(),
            None => status_code.into_response(),
        }
    }
}
