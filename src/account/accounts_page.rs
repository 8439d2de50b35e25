//! Displays accounts and their balances.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountBalance, get_account_balances},
    display::{format_currency, total_account_balance},
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The account data to display in the view
#[derive(Debug, PartialEq)]
struct AccountTableRow {
    name: String,
    initial_balance: f64,
    balance: f64,
    edit_url: String,
    delete_url: String,
}

impl From<&AccountBalance> for AccountTableRow {
    fn from(account_balance: &AccountBalance) -> Self {
        let account = &account_balance.account;

        Self {
            name: account.name.clone(),
            initial_balance: account.initial_balance,
            balance: account_balance.balance,
            edit_url: format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id),
            delete_url: format_endpoint(endpoints::ACCOUNT, account.id),
        }
    }
}

fn accounts_view(accounts: &[AccountTableRow], total_balance: f64) -> Markup {
    let create_account_page_url = endpoints::NEW_ACCOUNT_VIEW;
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let table_row = |account: &AccountTableRow| {
        let action_links = edit_delete_action_links(
            &account.edit_url,
            &account.delete_url,
            &format!(
                "Are you sure you want to delete the account '{}' and all of its transactions? This cannot be undone.",
                account.name
            ),
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (account.name)
                }

                td class="px-6 py-4 text-right"
                {
                    (format_currency(account.initial_balance))
                }

                td class="px-6 py-4 text-right"
                {
                    (format_currency(account.balance))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (action_links)
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(create_account_page_url) class=(LINK_STYLE)
                    {
                        "Add Account"
                    }
                }

                p data-total-balance
                {
                    "Total balance: "
                    span class="font-semibold tabular-nums" { (format_currency(total_balance)) }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    "Initial Balance"
                                }
                                th scope="col" class="px-6 py-3 text-right"
                                {
                                    "Balance"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No accounts found. Create an account "
                                        a href=(create_account_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Accounts", &content)
}

/// Renders the accounts page showing all accounts with their current balance.
pub async fn get_accounts_page(State(state): State<AccountsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account_balances = get_account_balances(&connection)
        .inspect_err(|error| tracing::error!("could not get account balances: {error}"))?;

    let total_balance = total_account_balance(&account_balances);
    let rows: Vec<AccountTableRow> = account_balances.iter().map(AccountTableRow::from).collect();

    Ok(accounts_view(&rows, total_balance).into_response())
}


#[cfg(test)]
mod get_accounts_page_tests {
    use axum::{extract::State, http::StatusCode};
    use time::macros::date;

    use crate::{
        account::{NewAccount, accounts_page::AccountsPageState, get_accounts_page, insert_account},
        display::format_currency,
        test_utils::{
            assert_content_type, assert_valid_html, must_create_test_state, parse_html_document,
            select_texts,
        },
        transaction::{NewTransaction, Recurrence, insert_transaction},
    };

    #[tokio::test]
    async fn shows_balances_and_total() {
        let state = must_create_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let bank = insert_account(
                &NewAccount {
                    name: "Bank".to_owned(),
                    initial_balance: 100.0,
                },
                &connection,
            )
            .unwrap();
            insert_account(
                &NewAccount {
                    name: "Cash".to_owned(),
                    initial_balance: 20.0,
                },
                &connection,
            )
            .unwrap();
            insert_transaction(
                &NewTransaction {
                    account: bank.id,
                    amount: -40.0,
                    date: date!(2025 - 03 - 03),
                    description: "Shoes".to_owned(),
                    recurrence: Recurrence::Once,
                },
                &connection,
            )
            .unwrap();
        }
        let page_state = AccountsPageState {
            db_connection: state.db_connection.clone(),
        };

        let response = get_accounts_page(State(page_state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_texts(&html, "tbody tr td:nth-of-type(2)"),
            vec![format_currency(60.0), format_currency(20.0)]
        );
        assert_eq!(
            select_texts(&html, "[data-total-balance] span"),
            vec![format_currency(80.0)]
        );
    }
}
