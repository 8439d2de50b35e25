//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRefresh, HxRequest};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    api_error::{ApiError, Operation, Resource},
    endpoints::{self, parse_id},
    transaction::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    transaction_id: Result<Path<String>, PathRejection>,
    HxRequest(is_htmx): HxRequest,
) -> Result<Response, ApiError> {
    let Some(transaction_id) = transaction_id.ok().and_then(|Path(id)| parse_id(&id)) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    tracing::info!(
        "{}/{transaction_id} - DELETE-Request",
        endpoints::TRANSACTIONS_API
    );

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_transaction(transaction_id, &connection) {
        Ok(()) if is_htmx => Ok((StatusCode::NO_CONTENT, HxRefresh(true), ()).into_response()),
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(Error::NotFound) => Err(ApiError::Undefined(
            Resource::Transaction,
            Operation::Delete,
        )),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Err(error.into())
        }
    }
}
