//! Sets up the SQLite database that backs the accounts and transactions collections.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, account::create_account_table, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not already exist.
///
/// All tables are created inside one exclusive transaction, so either every
/// table exists afterwards or none of them were created.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
