//! Defines the endpoint for deleting an account.

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
    account::delete_account,
    api_error::{ApiError, Operation, Resource},
    endpoints::{self, parse_id},
};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing accounts.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account and all of its transactions.
///
/// Responds with 204 No Content. Requests from HTMX also get told to refresh
/// the page, since there is no content to swap in.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    account_id: Result<Path<String>, PathRejection>,
    HxRequest(is_htmx): HxRequest,
) -> Result<Response, ApiError> {
    let Some(account_id) = account_id.ok().and_then(|Path(id)| parse_id(&id)) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    tracing::info!("{}/{account_id} - DELETE-Request", endpoints::ACCOUNTS_API);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_account(account_id, &connection) {
        Ok(()) if is_htmx => Ok((StatusCode::NO_CONTENT, HxRefresh(true), ()).into_response()),
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(Error::NotFound) => Err(ApiError::Undefined(Resource::Account, Operation::Delete)),
        Err(error) => {
            tracing::error!("Could not delete account {account_id}: {error}");
            Err(error.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_htmx::HX_REFRESH;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        AppState,
        account::{Account, NewAccount, get_all_accounts, insert_account},
        endpoints::{self, format_endpoint},
        test_utils::{must_create_test_server, must_create_test_state},
        transaction::{NewTransaction, Recurrence, get_all_transactions, insert_transaction},
    };

    #[tokio::test]
    async fn deletes_account_and_its_transactions() {
        let state = must_create_test_state();
        let (doomed, kept) = {
            let connection = state.db_connection.lock().unwrap();
            let doomed = insert_account(
                &NewAccount {
                    name: "Cash".to_owned(),
                    initial_balance: 5.0,
                },
                &connection,
            )
            .unwrap();
            let kept = insert_account(
                &NewAccount {
                    name: "Bank".to_owned(),
                    initial_balance: 50.0,
                },
                &connection,
            )
            .unwrap();
            for account in [doomed.id, kept.id] {
                insert_transaction(
                    &NewTransaction {
                        account,
                        amount: -2.5,
                        date: date!(2025 - 03 - 01),
                        description: "Bus fare".to_owned(),
                        recurrence: Recurrence::Once,
                    },
                    &connection,
                )
                .unwrap();
            }
            (doomed, kept)
        };
        let server = must_create_test_server(state.clone());

        let response = server
            .delete(&format_endpoint(endpoints::ACCOUNT, doomed.id))
            .await;

        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_accounts(&connection).unwrap(), vec![kept.clone()]);
        let transactions = get_all_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].account, kept.id);
    }

    #[tokio::test]
    async fn deleted_account_is_not_listed() {
        let server = must_create_test_server(must_create_test_state());
        let created = server
            .post(endpoints::ACCOUNTS_API)
            .json(&json!({"name": "Cash", "initialBalance": 1}))
            .await
            .json::<Value>();
        let id = created["id"].as_i64().unwrap();

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let accounts = server.get(endpoints::ACCOUNTS_API).await.json::<Value>();
        assert_eq!(accounts, json!([]));
    }

    #[tokio::test]
    async fn missing_account_is_undefined_error() {
        let server = must_create_test_server(must_create_test_state());

        let response = server.delete(&format_endpoint(endpoints::ACCOUNT, 42)).await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({
                "error": {
                    "name": "AccountUndefinedError",
                    "message": "The account to be deleted doesn't exist"
                }
            })
        );
    }

    fn must_insert_account_with_transaction(state: &AppState) -> Account {
        let connection = state.db_connection.lock().unwrap();
        let account = insert_account(
            &NewAccount {
                name: "Cash".to_owned(),
                initial_balance: 5.0,
            },
            &connection,
        )
        .unwrap();
        insert_transaction(
            &NewTransaction {
                account: account.id,
                amount: -2.5,
                date: date!(2025 - 03 - 01),
                description: "Bus fare".to_owned(),
                recurrence: Recurrence::Once,
            },
            &connection,
        )
        .unwrap();

        account
    }

    #[tokio::test]
    async fn htmx_delete_refreshes_page() {
        let state = must_create_test_state();
        let account = must_insert_account_with_transaction(&state);
        let server = must_create_test_server(state.clone());

        let response = server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .add_header(
                HeaderName::from_static("hx-request"),
                HeaderValue::from_static("true"),
            )
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(response.headers().get(HX_REFRESH).unwrap(), "true");
        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_accounts(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_account_and_transactions() {
        let state = must_create_test_state();
        let account = must_insert_account_with_transaction(&state);
        state
            .db_connection
            .lock()
            .unwrap()
            .execute(
                "CREATE TRIGGER keep_accounts BEFORE DELETE ON account \
                BEGIN SELECT RAISE(ABORT, 'account is locked'); END",
                (),
            )
            .unwrap();
        let server = must_create_test_server(state.clone());

        let response = server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().is_empty());
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_accounts(&connection).unwrap(), vec![account.clone()]);
        let transactions = get_all_transactions(&connection).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].account, account.id);
    }

    #[tokio::test]
    async fn signed_id_does_not_match() {
        let state = must_create_test_state();
        let account = must_insert_account_with_transaction(&state);
        let server = must_create_test_server(state.clone());

        let signed_id = format!("+{}", account.id);
        for id in ["-1", "+1", signed_id.as_str()] {
            let response = server.delete(&format!("{}/{id}", endpoints::ACCOUNTS_API)).await;

            response.assert_status(StatusCode::NOT_FOUND);
            assert!(response.text().is_empty(), "want empty body for id {id:?}");
        }
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_accounts(&connection).unwrap(), vec![account]);
    }
}
