//! The dialog for creating or editing an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_account},
    endpoints::{self, format_endpoint, parse_id},
    html::{ApiFormMethod, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, api_form, dialog_view},
    navigation::NavBar,
};

/// The state needed for the edit account dialog.
#[derive(Debug, Clone)]
pub struct AccountDialogState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountDialogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn account_fields(name: &str, initial_balance: &str) -> Markup {
    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                id="name"
                type="text"
                name="name"
                placeholder="Checking account"
                value=(name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="initialBalance" class=(FORM_LABEL_STYLE) { "Initial Balance (€)" }

            input
                id="initialBalance"
                type="text"
                inputmode="decimal"
                name="initialBalance"
                placeholder="0,00"
                value=(initial_balance)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn new_account_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW).into_html();
    let form = api_form(
        ApiFormMethod::Post,
        endpoints::ACCOUNTS_API,
        &account_fields("", ""),
        "Create Account",
        endpoints::ACCOUNTS_VIEW,
    );

    dialog_view("Create Account", nav_bar, &form)
}

fn edit_account_view(account: &Account) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
    let nav_bar = NavBar::new(&edit_url).into_html();
    let form = api_form(
        ApiFormMethod::Put,
        &format_endpoint(endpoints::ACCOUNT, account.id),
        &account_fields(&account.name, &account.initial_balance.to_string()),
        "Save Account",
        endpoints::ACCOUNTS_VIEW,
    );

    dialog_view("Edit Account", nav_bar, &form)
}

/// Renders the dialog for creating an account.
pub async fn get_new_account_page() -> Response {
    new_account_view().into_response()
}

/// Renders the dialog for editing an account, filled in with its current fields.
///
/// Responds with the 404 page if the account does not exist.
pub async fn get_edit_account_page(
    State(state): State<AccountDialogState>,
    account_id: Result<Path<String>, PathRejection>,
) -> Result<Response, Error> {
    let Some(account_id) = account_id.ok().and_then(|Path(id)| parse_id(&id)) else {
        return Err(Error::NotFound);
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("could not get account {account_id}: {error}");
        }
    })?;

    Ok(edit_account_view(&account).into_response())
}
