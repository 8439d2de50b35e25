mod accounts_page;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod dialog_page;
mod edit_endpoint;
mod list_endpoint;
mod validation;

pub use accounts_page::get_accounts_page;
pub use core::{
    Account, AccountBalance, AccountId, NewAccount, account_exists, create_account_table,
    delete_account, get_account, get_account_balances, get_all_accounts, insert_account,
    update_account,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use dialog_page::{get_edit_account_page, get_new_account_page};
pub use edit_endpoint::edit_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
