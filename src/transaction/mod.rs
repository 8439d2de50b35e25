mod core;
mod create_endpoint;
mod delete_endpoint;
mod dialog_page;
mod edit_endpoint;
mod list_endpoint;
mod transactions_page;
mod validation;

pub use core::{
    NewTransaction, Recurrence, Transaction, TransactionId, create_transaction_table,
    delete_transaction, delete_transactions_for_account, get_all_transactions, get_transaction,
    insert_transaction, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use dialog_page::{get_edit_transaction_page, get_new_transaction_page};
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use transactions_page::get_transactions_page;
