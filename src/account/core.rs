//! Defines the account model and the queries on the accounts collection.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::Serialize;

use crate::{Error, transaction::delete_transactions_for_account};

/// Alias for the integer type used for account IDs.
pub type AccountId = i64;

/// A bank account, credit card or cash wallet, as stored in the accounts collection.
///
/// The ID is serialized as `_id`, the internal identifier field of stored
/// documents. Use [to_public_json](crate::response_formatting::to_public_json)
/// before sending an account to a client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The ID of the account.
    #[serde(rename = "_id")]
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The balance of the account in Euro before any transactions.
    pub initial_balance: f64,
}

/// The validated data for creating or replacing an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The balance of the account in Euro before any transactions.
    pub initial_balance: f64,
}

/// An account together with its current balance.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    /// The account.
    pub account: Account,
    /// The initial balance plus the amounts of all the account's transactions.
    pub balance: f64,
}

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            initial_balance REAL NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let initial_balance = row.get(2)?;

    Ok(Account {
        id,
        name,
        initial_balance,
    })
}

/// Insert a new account into the accounts collection.
///
/// # Errors
/// Returns an [Error::SqlError] if the account could not be inserted.
pub fn insert_account(account: &NewAccount, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(
            "INSERT INTO account (name, initial_balance) VALUES (?1, ?2)
            RETURNING id, name, initial_balance",
        )?
        .query_row((&account.name, account.initial_balance), map_row_to_account)
        .map_err(Error::from)
}

/// Get every account, in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, initial_balance FROM account ORDER BY id ASC")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Get the account with the ID `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no account with the ID `id`, or an
/// [Error::SqlError] if the query fails.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, name, initial_balance FROM account WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_account)
        .map_err(Error::from)
}

/// Whether an account with the ID `id` exists.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn account_exists(id: AccountId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM account WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Overwrite the name and initial balance of the account with the ID `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no account with the ID `id`, or an
/// [Error::SqlError] if the update fails.
pub fn update_account(
    id: AccountId,
    account: &NewAccount,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(
            "UPDATE account SET name = ?1, initial_balance = ?2 WHERE id = ?3
            RETURNING id, name, initial_balance",
        )?
        .query_row(
            (&account.name, account.initial_balance, id),
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Delete the account with the ID `id` along with all of its transactions.
///
/// The transactions are deleted first, then the account. Both deletes run in
/// one database transaction, so a failure leaves both collections unchanged.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no account with the ID `id`, or an
/// [Error::SqlError] if either delete fails.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    if !account_exists(id, &transaction)? {
        return Err(Error::NotFound);
    }

    let transactions_deleted = delete_transactions_for_account(id, &transaction)?;
    tracing::debug!("Deleted {transactions_deleted} transactions of account {id}");

    transaction.execute("DELETE FROM account WHERE id = ?1", [id])?;
    transaction.commit()?;

    Ok(())
}

/// Get every account with its current balance, ordered by name.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_account_balances(connection: &Connection) -> Result<Vec<AccountBalance>, Error> {
    connection
        .prepare(
            "SELECT a.id, a.name, a.initial_balance,
                a.initial_balance + COALESCE(SUM(t.amount), 0)
            FROM account a
            LEFT JOIN \"transaction\" t ON t.account = a.id
            GROUP BY a.id
            ORDER BY a.name ASC, a.id ASC",
        )?
        .query_map([], |row| {
            Ok(AccountBalance {
                account: map_row_to_account(row)?,
                balance: row.get(3)?,
            })
        })?
        .map(|maybe_balance| maybe_balance.map_err(Error::from))
        .collect()
}
