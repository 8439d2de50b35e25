//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRedirect, HxRequest};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{insert_account, validation::AccountFields},
    api_error::{ApiError, Resource},
    endpoints,
    fields::{Fields, FieldsRejection},
    response_formatting::to_public_json,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account, responds with the stored account.
///
/// Requests from HTMX are also redirected to the accounts page.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    HxRequest(is_htmx): HxRequest,
    fields: Result<Fields<AccountFields>, FieldsRejection>,
) -> Result<Response, ApiError> {
    let Fields(fields) =
        fields.map_err(|rejection| ApiError::from_rejection(Resource::Account, rejection))?;
    tracing::info!("{} - POST-Request: {fields:?}", endpoints::ACCOUNTS_API);

    let new_account = fields
        .validate()
        .map_err(|message| ApiError::Validation(Resource::Account, message))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = insert_account(&new_account, &connection).inspect_err(|error| {
        tracing::error!("Could not create account with {new_account:?}: {error}")
    })?;
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
