//! The dialog for creating or editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    display::date_datetime_attr,
    endpoints::{self, format_endpoint, parse_id},
    html::{
        ApiFormMethod, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, api_form, dialog_view,
    },
    navigation::NavBar,
    transaction::{Recurrence, Transaction, get_transaction},
};

/// The state needed for the transaction dialogs.
#[derive(Debug, Clone)]
pub struct TransactionDialogState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionDialogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The values the form is filled in with.
struct TransactionFormValues {
    account: Option<i64>,
    amount: String,
    date: Date,
    description: String,
    recurrence: Recurrence,
}

impl From<&Transaction> for TransactionFormValues {
    fn from(transaction: &Transaction) -> Self {
        Self {
            account: Some(transaction.account),
            amount: transaction.amount.to_string(),
            date: transaction.date,
            description: transaction.description.clone(),
            recurrence: transaction.recurrence,
        }
    }
}

fn transaction_fields(accounts: &[Account], values: &TransactionFormValues) -> Markup {
    html! {
        div
        {
            label for="account" class=(FORM_LABEL_STYLE) { "Account" }

            select id="account" name="account" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for account in accounts {
                    option
                        value=(account.id)
                        selected[values.account == Some(account.id)]
                    {
                        (account.name)
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount (€)" }

            input
                id="amount"
                type="text"
                inputmode="decimal"
                name="amount"
                placeholder="-12,50"
                value=(values.amount)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);

            p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
            {
                "Use a negative amount for expenses."
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                value=(date_datetime_attr(values.date))
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                id="description"
                type="text"
                name="description"
                placeholder="Groceries"
                value=(values.description)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="recurrence" class=(FORM_LABEL_STYLE) { "Recurrence" }

            select id="recurrence" name="recurrence" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for recurrence in Recurrence::ALL {
                    option
                        value=(recurrence.as_str())
                        selected[values.recurrence == recurrence]
                    {
                        (recurrence.to_string())
                    }
                }
            }
        }
    }
}

fn no_accounts_view() -> Markup {
    html! {
        p
        {
            "Transactions belong to an account. Create an account "
            a href=(endpoints::NEW_ACCOUNT_VIEW) class=(LINK_STYLE) { "here" }
            " first."
        }
    }
}

fn new_transaction_view(accounts: &[Account], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let values = TransactionFormValues {
        account: accounts.first().map(|account| account.id),
        amount: String::new(),
        date: today,
        description: String::new(),
        recurrence: Recurrence::default(),
    };

    let body = if accounts.is_empty() {
        no_accounts_view()
    } else {
        api_form(
            ApiFormMethod::Post,
            endpoints::TRANSACTIONS_API,
            &transaction_fields(accounts, &values),
            "Create Transaction",
            endpoints::TRANSACTIONS_VIEW,
        )
    };

    dialog_view("Create Transaction", nav_bar, &body)
}

fn edit_transaction_view(accounts: &[Account], transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let nav_bar = NavBar::new(&edit_url).into_html();
    let form = api_form(
        ApiFormMethod::Put,
        &format_endpoint(endpoints::TRANSACTION, transaction.id),
        &transaction_fields(accounts, &TransactionFormValues::from(transaction)),
        "Save Transaction",
        endpoints::TRANSACTIONS_VIEW,
    );

    dialog_view("Edit Transaction", nav_bar, &form)
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Renders the dialog for creating a transaction, dated today.
pub async fn get_new_transaction_page(
    State(state): State<TransactionDialogState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;

    Ok(new_transaction_view(&accounts, today()).into_response())
}

/// Renders the dialog for editing a transaction, filled in with its current fields.
///
/// Responds with the 404 page if the transaction does not exist.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionDialogState>,
    transaction_id: Result<Path<String>, PathRejection>,
) -> Result<Response, Error> {
    let Some(transaction_id) = transaction_id.ok().and_then(|Path(id)| parse_id(&id)) else {
        return Err(Error::NotFound);
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("could not get transaction {transaction_id}: {error}");
        }
    })?;
    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;

    Ok(edit_transaction_view(&accounts, &transaction).into_response())
}
