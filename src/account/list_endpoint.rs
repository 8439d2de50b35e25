//! Defines the endpoint for listing all accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    AppState, Error, account::get_all_accounts, api_error::ApiError, endpoints,
    response_formatting::to_public_json_list,
};

/// The state needed to list accounts.
#[derive(Debug, Clone)]
pub struct ListAccountsState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListAccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every account as a JSON array.
pub async fn list_accounts_endpoint(
    State(state): State<ListAccountsState>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!("{} - GET-Request", endpoints::ACCOUNTS_API);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;

    Ok(Json(to_public_json_list(&accounts)?))
}
