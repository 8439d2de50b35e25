//! Defines the endpoint for updating a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRedirect, HxRequest};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    api_error::{ApiError, Operation, Resource},
    endpoints::{self, parse_id},
    fields::{Fields, FieldsRejection},
    response_formatting::to_public_json,
    transaction::{update_transaction, validation::TransactionFields},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing a transaction, responds with the updated
/// transaction and the status code 201.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    transaction_id: Result<Path<String>, PathRejection>,
    HxRequest(is_htmx): HxRequest,
    fields: Result<Fields<TransactionFields>, FieldsRejection>,
) -> Result<Response, ApiError> {
    let Some(transaction_id) = transaction_id.ok().and_then(|Path(id)| parse_id(&id)) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let Fields(fields) =
        fields.map_err(|rejection| ApiError::from_rejection(Resource::Transaction, rejection))?;
    tracing::info!(
        "{}/{transaction_id} - PUT-Request: {fields:?}",
        endpoints::TRANSACTIONS_API
    );

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let new_transaction = fields.validate(&connection)?;

    let transaction = match update_transaction(transaction_id, &new_transaction, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => {
            return Err(ApiError::Undefined(Resource::Transaction, Operation::Change));
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            return Err(error.into());
        }
    };
    let body = Json(to_public_json(&transaction)?);

    if is_htmx {
        Ok((
            StatusCode::CREATED,
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            body,
        )
            .into_response())
    } else {
        Ok((StatusCode::CREATED, body).into_response())
    }
}
