//! The input schema and validation rules for account requests.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    account::NewAccount,
    fields::{field_text, parse_decimal},
};

/// The fields a client may send when creating or updating an account.
///
/// Any other field is rejected while deserializing.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AccountFields {
    /// The display name of the account.
    pub name: Option<Value>,
    /// The balance of the account before any transactions, as a number or text.
    pub initial_balance: Option<Value>,
}

impl AccountFields {
    /// Check the fields against the account rules.
    ///
    /// The name is trimmed and must start with a letter. The initial balance
    /// may use a comma as the decimal separator.
    ///
    /// # Errors
    /// Returns the message of the first rule that failed, checking the name
    /// before the initial balance.
    pub fn validate(self) -> Result<NewAccount, String> {
        let name = validate_name(self.name.as_ref())?;
        let initial_balance = validate_initial_balance(self.initial_balance.as_ref())?;

        Ok(NewAccount {
            name,
            initial_balance,
        })
    }
}

fn validate_name(value: Option<&Value>) -> Result<String, String> {
    let Some(name) = field_text(value) else {
        return Err("Name must start with a letter".to_owned());
    };
    let name = name.trim();

    if name.is_empty() {
        return Err("Name may not be empty".to_owned());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err("Name must start with a letter".to_owned());
    }

    Ok(name.to_owned())
}

fn validate_initial_balance(value: Option<&Value>) -> Result<f64, String> {
    let Some(balance) = field_text(value) else {
        return Err("Invalid initial balance".to_owned());
    };

    if balance.is_empty() {
        return Err("Initial balance may not be empty".to_owned());
    }

    parse_decimal(&balance).ok_or_else(|| "Invalid initial balance".to_owned())
}
