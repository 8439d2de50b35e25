//! Defines the transaction model and the queries on the transactions collection.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, account::AccountId};

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// How often a transaction repeats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// The transaction happens once.
    #[default]
    Once,
    /// The transaction repeats every day.
    Daily,
    /// The transaction repeats every week.
    Weekly,
    /// The transaction repeats every month.
    Monthly,
    /// The transaction repeats every year.
    Yearly,
}

impl Recurrence {
    /// Every recurrence, in the order they are offered in forms.
    pub const ALL: [Recurrence; 5] = [
        Recurrence::Once,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];

    /// The value used on the API and in the database, e.g. "monthly".
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }

    /// Parse the value used on the API and in the database.
    pub fn parse(value: &str) -> Option<Recurrence> {
        Recurrence::ALL
            .into_iter()
            .find(|recurrence| recurrence.as_str() == value)
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Recurrence::Once => "One-off",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Yearly => "Yearly",
        };

        write!(f, "{name}")
    }
}

impl ToSql for Recurrence {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Recurrence {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Recurrence::parse(text).ok_or_else(|| {
            FromSqlError::Other(format!("unknown recurrence \"{text}\"").into())
        })
    }
}

/// An expense or income on an account, as stored in the transactions collection.
///
/// Negative amounts are expenses and positive amounts are income. The ID is
/// serialized as `_id`, see [Account](crate::account::Account).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    #[serde(rename = "_id")]
    pub id: TransactionId,
    /// The ID of the account the money moved in or out of.
    pub account: AccountId,
    /// The amount of money in Euro.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for.
    pub description: String,
    /// How often the transaction repeats.
    pub recurrence: Recurrence,
}

/// The validated data for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The ID of the account the money moved in or out of.
    pub account: AccountId,
    /// The amount of money in Euro.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for.
    pub description: String,
    /// How often the transaction repeats.
    pub recurrence: Recurrence,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// The `account` column is not a foreign key, deleting an account removes
/// its transactions with [delete_transactions_for_account].
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account INTEGER NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                recurrence TEXT NOT NULL DEFAULT 'once'
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(account);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let account = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let description = row.get(4)?;
    let recurrence = row.get(5)?;

    Ok(Transaction {
        id,
        account,
        amount,
        date,
        description,
        recurrence,
    })
}

/// Insert a new transaction into the transactions collection.
///
/// The caller is responsible for checking that the account exists.
///
/// # Errors
/// Returns an [Error::SqlError] if the transaction could not be inserted.
pub fn insert_transaction(
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (account, amount, date, description, recurrence)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, account, amount, date, description, recurrence",
        )?
        .query_row(
            (
                transaction.account,
                transaction.amount,
                transaction.date,
                &transaction.description,
                transaction.recurrence,
            ),
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Get every transaction, in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, account, amount, date, description, recurrence
            FROM \"transaction\" ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the transaction with the ID `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no transaction with the ID `id`,
/// or an [Error::SqlError] if the query fails.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, account, amount, date, description, recurrence
            FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(Error::from)
}

/// Overwrite every field of the transaction with the ID `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no transaction with the ID `id`,
/// or an [Error::SqlError] if the update fails.
pub fn update_transaction(
    id: TransactionId,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "UPDATE \"transaction\"
            SET account = ?1, amount = ?2, date = ?3, description = ?4, recurrence = ?5
            WHERE id = ?6
            RETURNING id, account, amount, date, description, recurrence",
        )?
        .query_row(
            (
                transaction.account,
                transaction.amount,
                transaction.date,
                &transaction.description,
                transaction.recurrence,
                id,
            ),
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Delete the transaction with the ID `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no transaction with the ID `id`,
/// or an [Error::SqlError] if the delete fails.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete every transaction on the account with the ID `account_id`.
///
/// Returns the number of deleted transactions.
///
/// # Errors
/// Returns an [Error::SqlError] if the delete fails.
pub fn delete_transactions_for_account(
    account_id: AccountId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE account = ?1",
            [account_id],
        )
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================
