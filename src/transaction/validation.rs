//! The input schema and validation rules for transaction requests.

use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    account::{AccountId, account_exists},
    api_error::{ApiError, Resource},
    fields::{field_text, parse_decimal},
    transaction::{NewTransaction, Recurrence},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The fields a client may send when creating or updating a transaction.
///
/// Any other field is rejected while deserializing.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionFields {
    /// The ID of the account, as a number or text.
    pub account: Option<Value>,
    /// The amount in Euro, as a number or text.
    pub amount: Option<Value>,
    /// The date as `YYYY-MM-DD`.
    pub date: Option<Value>,
    /// What the transaction was for.
    pub description: Option<Value>,
    /// How often the transaction repeats, defaults to once.
    pub recurrence: Option<Value>,
}

impl TransactionFields {
    /// Check the fields against the transaction rules.
    ///
    /// Rules are checked in field order: account, amount, date, description
    /// and then recurrence. The account must exist in `connection`.
    ///
    /// # Errors
    /// Returns an [ApiError::Validation] with the message of the first rule
    /// that failed, or [ApiError::Storage] if the account could not be looked up.
    pub fn validate(self, connection: &Connection) -> Result<NewTransaction, ApiError> {
        let account = validate_account(self.account.as_ref()).map_err(invalid)?;

        if !account_exists(account, connection)? {
            return Err(invalid(
                "The account of the transaction doesn't exist".to_owned(),
            ));
        }

        let amount = validate_amount(self.amount.as_ref()).map_err(invalid)?;
        let date = validate_date(self.date.as_ref()).map_err(invalid)?;
        let description = validate_description(self.description.as_ref()).map_err(invalid)?;
        let recurrence = validate_recurrence(self.recurrence.as_ref()).map_err(invalid)?;

        Ok(NewTransaction {
            account,
            amount,
            date,
            description,
            recurrence,
        })
    }
}

fn invalid(message: String) -> ApiError {
    ApiError::Validation(Resource::Transaction, message)
}

fn validate_account(value: Option<&Value>) -> Result<AccountId, String> {
    let Some(account) = field_text(value) else {
        return Err("Invalid account".to_owned());
    };
    let account = account.trim();

    if account.is_empty() {
        return Err("Account may not be empty".to_owned());
    }

    account
        .parse()
        .map_err(|_| "Invalid account".to_owned())
}

fn validate_amount(value: Option<&Value>) -> Result<f64, String> {
    let Some(amount) = field_text(value) else {
        return Err("Invalid amount".to_owned());
    };

    if amount.trim().is_empty() {
        return Err("Amount may not be empty".to_owned());
    }

    parse_decimal(&amount).ok_or_else(|| "Invalid amount".to_owned())
}

fn validate_date(value: Option<&Value>) -> Result<Date, String> {
    let Some(date) = field_text(value) else {
        return Err("Invalid date".to_owned());
    };
    let date = date.trim();

    if date.is_empty() {
        return Err("Date may not be empty".to_owned());
    }

    Date::parse(date, DATE_FORMAT).map_err(|_| "Invalid date".to_owned())
}

fn validate_description(value: Option<&Value>) -> Result<String, String> {
    let description = field_text(value).unwrap_or_default();
    let description = description.trim();

    if description.is_empty() {
        return Err("Description may not be empty".to_owned());
    }

    Ok(description.to_owned())
}

fn validate_recurrence(value: Option<&Value>) -> Result<Recurrence, String> {
    match value {
        None | Some(Value::Null) => Ok(Recurrence::default()),
        Some(Value::String(recurrence)) => {
            Recurrence::parse(recurrence.trim()).ok_or_else(|| "Invalid recurrence".to_owned())
        }
        Some(_) => Err("Invalid recurrence".to_owned()),
    }
}
