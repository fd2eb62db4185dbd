//! Ledger transaction model and the signed-amount rule.
//!
//! A transaction stores its resulting balance denormalized on the record,
//! so the balance after the most recent transaction is the account's
//! available balance without replaying the chain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Transaction type id whose amounts subtract from the balance.
///
/// The legacy lookup table negated the amount for type id 2 only; every
/// other id counted as a credit. That binary rule is kept as-is.
pub const WITHDRAWAL_TYPE_ID: i16 = 2;

/// Closed transaction-type lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn id(self) -> i16 {
        match self {
            TransactionType::Deposit => 1,
            TransactionType::Withdrawal => 2,
        }
    }

    pub fn from_id(id: i16) -> Result<Self, AppError> {
        match id {
            1 => Ok(TransactionType::Deposit),
            2 => Ok(TransactionType::Withdrawal),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown transaction type id: {other}"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
        }
    }

    /// Sign-adjust a positive amount for this type.
    ///
    /// Withdrawals negate; everything else passes through as a credit.
    pub fn signed_amount(self, amount: Decimal) -> Decimal {
        if self.id() == WITHDRAWAL_TYPE_ID {
            -amount
        } else {
            amount
        }
    }
}

/// A ledger transaction record.
///
/// `amount` is stored already sign-adjusted: withdrawals persist as
/// negative numbers. `balance` is the running balance after this
/// transaction was applied.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerTransaction {
    pub id: Uuid,

    /// Server-assigned creation timestamp; the per-account ordering key
    pub date: DateTime<Utc>,

    pub transaction_type: TransactionType,

    /// Signed amount (negative for withdrawals)
    pub amount: Decimal,

    /// Running balance after this transaction
    pub balance: Decimal,

    /// Owning account, immutable
    pub account_id: Uuid,
}

/// Request body for creating a transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "transaction_type": "withdrawal",
///   "amount": "200.00"
/// }
/// ```
///
/// The amount is the positive magnitude; the sign is derived from the
/// type on the server, never supplied by the caller.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub account_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
}

/// Request body for updating a transaction.
///
/// Only the most recent transaction of the account may be updated, and only
/// its type/amount can change. Identity and account are fixed.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
}

/// Response body for transaction endpoints.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub transaction_type: TransactionType,
    pub transaction_type_name: &'static str,
    pub amount: Decimal,
    pub balance: Decimal,
    pub account_id: Uuid,
}

impl From<LedgerTransaction> for TransactionResponse {
    fn from(tx: LedgerTransaction) -> Self {
        Self {
            id: tx.id,
            date: tx.date,
            transaction_type: tx.transaction_type,
            transaction_type_name: tx.transaction_type.name(),
            amount: tx.amount,
            balance: tx.balance,
            account_id: tx.account_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn withdrawal_negates_amount() {
        assert_eq!(
            TransactionType::Withdrawal.signed_amount(dec!(200.00)),
            dec!(-200.00)
        );
    }

    #[test]
    fn deposit_keeps_amount_positive() {
        assert_eq!(
            TransactionType::Deposit.signed_amount(dec!(500.00)),
            dec!(500.00)
        );
    }

    #[test]
    fn type_ids_round_trip() {
        assert_eq!(TransactionType::from_id(1).unwrap(), TransactionType::Deposit);
        assert_eq!(
            TransactionType::from_id(2).unwrap(),
            TransactionType::Withdrawal
        );
        assert!(TransactionType::from_id(7).is_err());
    }
}
