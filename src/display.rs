//! Formatting and list helpers used by the pages to display accounts and transactions.
//!
//! Every function here is pure: they only look at data that has already been
//! read from the database.

use std::{cmp::Reverse, collections::HashMap, sync::OnceLock};

use numfmt::{Formatter, Precision};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    account::{AccountBalance, AccountId},
    transaction::Transaction,
};

/// Shown in place of values that are empty.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Shown in place of an account name when the account ID does not resolve.
pub const UNKNOWN_ACCOUNT: &str = "Unknown account";

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:zero].[month repr:numerical padding:zero].[year]");

const ATTRIBUTE_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// Format `number` as an amount in Euro with two decimal places, e.g. "€1,234.50" or "-€12.30".
///
/// The amount is rounded to the nearest cent, so float noise such as
/// `0.1 + 0.2 - 0.3` is shown as "€0.00".
pub fn format_currency(number: f64) -> String {
    // numfmt truncates extra decimals instead of rounding them.
    let number = (number * 100.0).round() / 100.0;

    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("€")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-€")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted_string = match (positive_fmt, negative_fmt) {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 => return "€0.00".to_owned(),
        (_, Some(negative_fmt)) if number < 0.0 => negative_fmt.fmt_string(number.abs()),
        (Some(positive_fmt), _) if number > 0.0 => positive_fmt.fmt_string(number),
        _ if number < 0.0 => format!("-€{:.2}", number.abs()),
        _ => format!("€{number:.2}"),
    };

    pad_decimals(formatted_string)
}

/// numfmt omits trailing zeros, e.g. "12.30" is rendered as "12.3" and "12.00"
/// as "12", so add them back to always show two decimal places.
fn pad_decimals(mut formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        None => formatted_string.push_str(".00"),
        Some(dot) if formatted_string.len() - dot == 2 => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}

/// Format `date` for display, e.g. "05.01.2025".
pub fn format_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Format `date` for the `datetime` attribute of a `<time>` element or the
/// value of a date input, e.g. "2025-01-05".
pub fn date_datetime_attr(date: Date) -> String {
    date.format(ATTRIBUTE_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Sort transactions so that the newest come first.
///
/// Transactions on the same date are ordered by ID, newest first.
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|transaction| Reverse((transaction.date, transaction.id)));
}

/// Look up the name of the account with the ID `account_id`.
pub fn account_name(account_id: AccountId, account_names: &HashMap<AccountId, String>) -> &str {
    account_names
        .get(&account_id)
        .map(String::as_str)
        .unwrap_or(UNKNOWN_ACCOUNT)
}

/// Keep the transactions whose description or account name contains `search`.
///
/// The match ignores case and the whitespace around `search`. An empty search
/// keeps every transaction.
pub fn filter_transactions(
    transactions: Vec<Transaction>,
    search: &str,
    account_names: &HashMap<AccountId, String>,
) -> Vec<Transaction> {
    let search = search.trim().to_lowercase();

    if search.is_empty() {
        return transactions;
    }

    transactions
        .into_iter()
        .filter(|transaction| {
            transaction.description.to_lowercase().contains(&search)
                || account_name(transaction.account, account_names)
                    .to_lowercase()
                    .contains(&search)
        })
        .collect()
}

/// The sum of the balances of `accounts`.
pub fn total_account_balance(accounts: &[AccountBalance]) -> f64 {
    accounts.iter().map(|account| account.balance).sum()
}

/// Show [EMPTY_PLACEHOLDER] instead of an empty or blank string.
pub fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        EMPTY_PLACEHOLDER
    } else {
        text
    }
}


#[cfg(test)]
mod pipe_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::{
        account::{Account, AccountBalance},
        transaction::{Recurrence, Transaction},
    };

    use super::{
        UNKNOWN_ACCOUNT, account_name, date_datetime_attr, filter_transactions, format_date,
        or_placeholder, sort_transactions, total_account_balance,
    };

    fn transaction(id: i64, account: i64, date: time::Date, description: &str) -> Transaction {
        Transaction {
            id,
            account,
            amount: -1.0,
            date,
            description: description.to_owned(),
            recurrence: Recurrence::Once,
        }
    }

    fn account_names() -> HashMap<i64, String> {
        HashMap::from([(1, "Cash".to_owned()), (2, "Bank".to_owned())])
    }

    #[test]
    fn formats_dates() {
        assert_eq!(format_date(date!(2025 - 01 - 05)), "05.01.2025");
        assert_eq!(date_datetime_attr(date!(2025 - 01 - 05)), "2025-01-05");
    }

    #[test]
    fn sorts_newest_first() {
        let mut transactions = vec![
            transaction(1, 1, date!(2025 - 01 - 01), "a"),
            transaction(2, 1, date!(2025 - 03 - 01), "b"),
            transaction(3, 1, date!(2025 - 01 - 01), "c"),
        ];

        sort_transactions(&mut transactions);

        let ids: Vec<_> = transactions.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn resolves_account_names() {
        let names = account_names();

        assert_eq!(account_name(2, &names), "Bank");
        assert_eq!(account_name(9, &names), UNKNOWN_ACCOUNT);
    }

    #[test]
    fn empty_search_keeps_everything() {
        let transactions = vec![
            transaction(1, 1, date!(2025 - 01 - 01), "Rent"),
            transaction(2, 2, date!(2025 - 01 - 02), "Groceries"),
        ];

        let got = filter_transactions(transactions.clone(), "  ", &account_names());

        assert_eq!(got, transactions);
    }

    #[test]
    fn search_matches_description_ignoring_case() {
        let transactions = vec![
            transaction(1, 1, date!(2025 - 01 - 01), "Rent"),
            transaction(2, 1, date!(2025 - 01 - 02), "Groceries"),
        ];

        let got = filter_transactions(transactions, "GROC", &account_names());

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, 2);
    }

    #[test]
    fn search_matches_account_name() {
        let transactions = vec![
            transaction(1, 1, date!(2025 - 01 - 01), "Rent"),
            transaction(2, 2, date!(2025 - 01 - 02), "Rent"),
        ];

        let got = filter_transactions(transactions, "bank", &account_names());

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].account, 2);
    }

    #[test]
    fn totals_account_balances() {
        let accounts = [
            AccountBalance {
                account: Account {
                    id: 1,
                    name: "Cash".to_owned(),
                    initial_balance: 10.0,
                },
                balance: 12.5,
            },
            AccountBalance {
                account: Account {
                    id: 2,
                    name: "Card".to_owned(),
                    initial_balance: 0.0,
                },
                balance: -2.5,
            },
        ];

        assert_eq!(total_account_balance(&accounts), 10.0);
        assert_eq!(total_account_balance(&[]), 0.0);
    }

    #[test]
    fn empty_strings_get_placeholder() {
        assert_eq!(or_placeholder(""), "-");
        assert_eq!(or_placeholder("   "), "-");
        assert_eq!(or_placeholder("Rent"), "Rent");
    }
}
