//! Defines the endpoint for creating a new transaction.
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
    api_error::{ApiError, Resource},
    endpoints,
    fields::{Fields, FieldsRejection},
    response_formatting::to_public_json,
    transaction::{insert_transaction, validation::TransactionFields},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    HxRequest(is_htmx): HxRequest,
    fields: Result<Fields<TransactionFields>, FieldsRejection>,
) -> Result<Response, ApiError> {
    let Fields(fields) =
        fields.map_err(|rejection| ApiError::from_rejection(Resource::Transaction, rejection))?;
    tracing::info!("{} - POST-Request: {fields:?}", endpoints::TRANSACTIONS_API);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let new_transaction = fields.validate(&connection)?;

    let transaction = insert_transaction(&new_transaction, &connection).inspect_err(|error| {
        tracing::error!("Could not create transaction with {new_transaction:?}: {error}")
    })?;
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

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_htmx::HX_REDIRECT;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        account::{NewAccount, insert_account},
        endpoints,
        test_utils::{must_create_test_server, must_create_test_state},
        transaction::get_all_transactions,
    };

    fn state_with_account() -> AppState {
        let state = must_create_test_state();
        insert_account(
            &NewAccount {
                name: "Cash".to_owned(),
                initial_balance: 10.0,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        state
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = state_with_account();
        let server = must_create_test_server(state.clone());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "account": 1,
                "amount": "-12,3",
                "date": "2025-04-01",
                "description": "Groceries",
                "recurrence": "weekly"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "id": 1,
                "account": 1,
                "amount": -12.3,
                "date": "2025-04-01",
                "description": "Groceries",
                "recurrence": "weekly"
            })
        );
        let transactions = get_all_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, -12.3);
    }

    #[tokio::test]
    async fn recurrence_is_optional() {
        let server = must_create_test_server(state_with_account());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "account": "1",
                "amount": 5,
                "date": "2025-04-01",
                "description": "Refund"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["recurrence"], "once");
    }

    #[tokio::test]
    async fn extra_field_is_invalid_field_error() {
        let state = state_with_account();
        let server = must_create_test_server(state.clone());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "account": 1,
                "amount": 5,
                "date": "2025-04-01",
                "description": "Refund",
                "category": "Food"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "error": {
                    "name": "TransactionInvalidFieldError",
                    "message": "The transaction may only contain the specified fields"
                }
            })
        );
        let transactions = get_all_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn missing_account_is_validation_error() {
        let server = must_create_test_server(must_create_test_state());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "account": 7,
                "amount": 5,
                "date": "2025-04-01",
                "description": "Refund"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "error": {
                    "name": "TransactionValidationError",
                    "message": "The account of the transaction doesn't exist"
                }
            })
        );
    }

    #[tokio::test]
    async fn invalid_date_is_validation_error() {
        let server = must_create_test_server(state_with_account());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "account": 1,
                "amount": 5,
                "date": "yesterday",
                "description": "Refund"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"]["message"], "Invalid date");
    }

    #[tokio::test]
    async fn htmx_request_is_redirected_to_transactions_page() {
        let server = must_create_test_server(state_with_account());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .add_header(
                HeaderName::from_static("hx-request"),
                HeaderValue::from_static("true"),
            )
            .json(&json!({
                "account": "1",
                "amount": "5",
                "date": "2025-04-01",
                "description": "Refund",
                "recurrence": "once"
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::TRANSACTIONS_VIEW
        );
    }
}
