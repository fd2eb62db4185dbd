//! Account model and API request/response types.
//!
//! This module defines:
//! - `Account`: the account record held by the stores
//! - `AccountType`: the closed account-type lookup
//! - Request/response types for the account endpoints

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Closed account-type lookup.
///
/// The legacy system kept account types as a mutable name/id lookup table;
/// here it is a tagged enumeration with the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Checking,
}

impl AccountType {
    /// Numeric id as persisted and as exposed on the wire lookup.
    pub fn id(self) -> i16 {
        match self {
            AccountType::Savings => 1,
            AccountType::Checking => 2,
        }
    }

    /// Resolve a stored id back into the enumeration.
    pub fn from_id(id: i16) -> Result<Self, AppError> {
        match id {
            1 => Ok(AccountType::Savings),
            2 => Ok(AccountType::Checking),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown account type id: {other}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
        }
    }
}

/// An account record.
///
/// `account_number` and `customer_id` are immutable once the account is
/// created; `initial_balance` is the balance the ledger starts from and is
/// never recomputed. The running balance lives on the transaction records.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Globally unique account number, 10-20 characters, immutable
    pub account_number: String,

    pub account_type: AccountType,

    /// Starting balance of the ledger chain, non-negative
    pub initial_balance: Decimal,

    /// Active flag; forced to true at creation
    pub status: bool,

    /// Owning customer, immutable
    pub customer_id: Uuid,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_number": "2254871234",
///   "account_type": "savings",
///   "initial_balance": "1000.00",
///   "customer_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// Whatever `status` the caller sends is ignored: accounts are always
/// created active.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub account_number: String,
    pub account_type: AccountType,

    #[serde(default)]
    pub initial_balance: Decimal,

    pub customer_id: Uuid,
}

/// Request body for updating an account.
///
/// The account number and customer id must match the stored record; sending
/// different values is rejected as an attempt to modify immutable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub id: Uuid,
    pub account_number: String,
    pub account_type: AccountType,
    pub initial_balance: Decimal,
    pub status: bool,
    pub customer_id: Uuid,
}

impl UpdateAccountRequest {
    pub fn into_account(self) -> Account {
        Account {
            id: self.id,
            account_number: self.account_number,
            account_type: self.account_type,
            initial_balance: self.initial_balance,
            status: self.status,
            customer_id: self.customer_id,
        }
    }
}

/// Response body for account endpoints.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub account_number: String,
    pub account_type: AccountType,
    pub account_type_name: &'static str,
    pub initial_balance: Decimal,
    pub status: bool,
    pub customer_id: Uuid,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            account_type: account.account_type,
            account_type_name: account.account_type.name(),
            initial_balance: account.initial_balance,
            status: account.status,
            customer_id: account.customer_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_ids_round_trip() {
        assert_eq!(AccountType::from_id(1).unwrap(), AccountType::Savings);
        assert_eq!(AccountType::from_id(2).unwrap(), AccountType::Checking);
        assert_eq!(AccountType::Savings.id(), 1);
        assert_eq!(AccountType::Checking.id(), 2);
    }

    #[test]
    fn unknown_account_type_id_is_rejected() {
        assert!(matches!(
            AccountType::from_id(9),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
