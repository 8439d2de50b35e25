//! Displays the transactions with a search box and the total balance of all accounts.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountId, get_account_balances},
    display::{
        account_name, date_datetime_attr, filter_transactions, format_currency, format_date,
        or_placeholder, sort_transactions, total_account_balance,
    },
    endpoints::{self, format_endpoint},
    html::{
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
    search::SearchQuery,
    transaction::{Transaction, get_all_transactions},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The transaction data to display in the view.
#[derive(Debug, PartialEq)]
struct TransactionTableRow {
    date: time::Date,
    description: String,
    account_name: String,
    recurrence: String,
    amount: f64,
    edit_url: String,
    delete_url: String,
}

impl TransactionTableRow {
    fn new(transaction: &Transaction, account_names: &HashMap<AccountId, String>) -> Self {
        Self {
            date: transaction.date,
            description: transaction.description.clone(),
            account_name: account_name(transaction.account, account_names).to_owned(),
            recurrence: transaction.recurrence.to_string(),
            amount: transaction.amount,
            edit_url: format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
            delete_url: format_endpoint(endpoints::TRANSACTION, transaction.id),
        }
    }
}

fn transactions_view(
    transactions: &[TransactionTableRow],
    search: &SearchQuery,
    total_balance: f64,
) -> Markup {
    let create_transaction_page_url = endpoints::NEW_TRANSACTION_VIEW;
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let table_row = |transaction: &TransactionTableRow| {
        let amount_style = if transaction.amount < 0.0 {
            "px-6 py-4 text-right tabular-nums text-red-600 dark:text-red-400"
        } else {
            "px-6 py-4 text-right tabular-nums text-green-600 dark:text-green-400"
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(date_datetime_attr(transaction.date))
                    {
                        (format_date(transaction.date))
                    }
                }

                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 dark:text-white"
                {
                    (or_placeholder(&transaction.description))
                }

                td class=(TABLE_CELL_STYLE) { (transaction.account_name) }

                td class=(TABLE_CELL_STYLE) { (transaction.recurrence) }

                td class=(amount_style) { (format_currency(transaction.amount)) }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &transaction.edit_url,
                            &transaction.delete_url,
                            &format!(
                                "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
                                transaction.description
                            ),
                        ))
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
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(create_transaction_page_url) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                div class="flex justify-between flex-wrap items-center gap-4"
                {
                    form
                        method="get"
                        action=(endpoints::TRANSACTIONS_VIEW)
                        role="search"
                        class="flex gap-2"
                    {
                        input
                            type="search"
                            name="search"
                            placeholder="Search description or account"
                            aria-label="Search transactions"
                            value=(search.search)
                            class=(FORM_TEXT_INPUT_STYLE);

                        @if search.is_active() {
                            a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Reset" }
                        }
                    }

                    p data-total-balance
                    {
                        "Total balance: "
                        span class="font-semibold tabular-nums" { (format_currency(total_balance)) }
                    }
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Recurrence" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (table_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        @if search.is_active() {
                                            "No transactions match \"" (search.search.trim()) "\"."
                                        } @else {
                                            "No transactions found. Create a transaction "
                                            a href=(create_transaction_page_url) class=(LINK_STYLE)
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
        }
    );

    base("Transactions", &content)
}

/// Renders the transactions page, newest first and filtered by the search term.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(search): Query<SearchQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account_balances = get_account_balances(&connection)
        .inspect_err(|error| tracing::error!("could not get account balances: {error}"))?;
    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get all transactions: {error}"))?;

    let account_names: HashMap<AccountId, String> = account_balances
        .iter()
        .map(|balance| (balance.account.id, balance.account.name.clone()))
        .collect();

    let mut transactions = filter_transactions(transactions, &search.search, &account_names);
    sort_transactions(&mut transactions);

    let rows: Vec<TransactionTableRow> = transactions
        .iter()
        .map(|transaction| TransactionTableRow::new(transaction, &account_names))
        .collect();

    Ok(transactions_view(&rows, &search, total_account_balance(&account_balances)).into_response())
}

#[cfg(test)]
mod transactions_template_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        search::SearchQuery,
        test_utils::assert_valid_html,
    };

    use super::{TransactionTableRow, transactions_view};

    fn row() -> TransactionTableRow {
        TransactionTableRow {
            date: date!(2025 - 01 - 05),
            description: "Rent".to_owned(),
            account_name: "Bank".to_owned(),
            recurrence: "Monthly".to_owned(),
            amount: -800.0,
            edit_url: format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, 1),
            delete_url: format_endpoint(endpoints::TRANSACTION, 1),
        }
    }

    #[test]
    fn renders_row_cells() {
        let rendered = transactions_view(&[row()], &SearchQuery::default(), 0.0).into_string();

        let html = Html::parse_document(&rendered);
        assert_valid_html(&html);
        let cells: Vec<String> = html
            .select(&Selector::parse("tbody tr td, tbody tr th").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(cells[0], "05.01.2025");
        assert_eq!(cells[1], "Rent");
        assert_eq!(cells[2], "Bank");
        assert_eq!(cells[3], "Monthly");
        let delete_url = html
            .select(&Selector::parse("tbody button").unwrap())
            .next()
            .and_then(|button| button.value().attr("hx-delete"))
            .expect("delete button missing");
        assert_eq!(delete_url, "/api/transactions/1");
    }

    #[test]
    fn empty_search_result_names_term() {
        let search = SearchQuery {
            search: "pizza".to_owned(),
        };

        let rendered = transactions_view(&[], &search, 0.0).into_string();

        let html = Html::parse_document(&rendered);
        assert_valid_html(&html);
        let cell = html
            .select(&Selector::parse("td[colspan='6']").unwrap())
            .next()
            .expect("empty state missing")
            .text()
            .collect::<String>();
        assert_eq!(cell.trim(), "No transactions match \"pizza\".");
    }

    #[test]
    fn empty_page_links_to_new_transaction() {
        let rendered = transactions_view(&[], &SearchQuery::default(), 0.0).into_string();

        let html = Html::parse_document(&rendered);
        let link = html
            .select(&Selector::parse("td[colspan='6'] a").unwrap())
            .next()
            .expect("link missing");
        assert_eq!(link.value().attr("href"), Some(endpoints::NEW_TRANSACTION_VIEW));
    }
}
