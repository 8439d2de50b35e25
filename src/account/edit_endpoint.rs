//! Defines the endpoint for updating an account
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
    account::{update_account, validation::AccountFields},
    api_error::{ApiError, Operation, Resource},
    endpoints::{self, parse_id},
    fields::{Fields, FieldsRejection},
    response_formatting::to_public_json,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the name and initial balance of an account.
///
/// Responds with the updated account and the status code 201. An ID that is
/// not a number does not match the route and gets a 404 without a body.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    account_id: Result<Path<String>, PathRejection>,
    HxRequest(is_htmx): HxRequest,
    fields: Result<Fields<AccountFields>, FieldsRejection>,
) -> Result<Response, ApiError> {
    let Some(account_id) = account_id.ok().and_then(|Path(id)| parse_id(&id)) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let Fields(fields) =
        fields.map_err(|rejection| ApiError::from_rejection(Resource::Account, rejection))?;
    tracing::info!("{}/{account_id} - PUT-Request: {fields:?}", endpoints::ACCOUNTS_API);

    let new_account = fields
        .validate()
        .map_err(|message| ApiError::Validation(Resource::Account, message))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = match update_account(account_id, &new_account, &connection) {
        Ok(account) => account,
        Err(Error::NotFound) => {
            return Err(ApiError::Undefined(Resource::Account, Operation::Change));
        }
        Err(error) => {
            tracing::error!("Could not update account {account_id}: {error}");
            return Err(error.into());
        }
    };
    let body = Json(to_public_json(&account)?);

    if is_htmx {
        Ok((
            StatusCode::CREATED,
            HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
            body,
        )
            .into_response())
    } else {
        Ok((StatusCode::CREATED, body).into_response())
    }
}
