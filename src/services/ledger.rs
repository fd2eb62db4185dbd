//! Transaction ledger engine - the balance-integrity core.
//!
//! Every account's transactions form an append-only chain: each record
//! stores the running balance after itself, so the available balance is
//! simply the last record's balance (or the account's initial balance for
//! an empty ledger). Mutation and deletion are restricted to the most
//! recent transaction of an account, which keeps the chain consistent in
//! O(1) without recomputing the balances stored on older records.
//!
//! # Concurrency
//!
//! Each mutating call is a read-modify-write over one account's chain
//! (read last transaction, compute, write). The engine serializes these
//! per account so two concurrent creates can never both observe the same
//! "last balance". The Postgres adapter's writes are individually atomic;
//! cross-instance deployments additionally need the database's own
//! isolation, which is the storage collaborator's contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::account::Account;
use crate::models::transaction::{
    CreateTransactionRequest, LedgerTransaction, UpdateTransactionRequest,
};
use crate::store::{AccountStore, TransactionStore};

const ACCOUNT_DOES_NOT_EXIST: &str = "Account does not exist";
const NOT_MOST_RECENT: &str =
    "This transaction cannot be modified/deleted as it is not the most recent one.";

pub struct LedgerEngine {
    transactions: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
    /// Per-account serialization of read-modify-write sequences
    account_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl LedgerEngine {
    pub fn new(transactions: Arc<dyn TransactionStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            transactions,
            accounts,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Record a new transaction and advance the account's running balance.
    ///
    /// The caller supplies a strictly positive amount; the stored amount is
    /// sign-adjusted from the type, so a withdrawal persists negative.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the amount is not strictly positive
    /// - `NotFound` if the account does not exist
    /// - `InsufficientFunds` if the resulting balance would be negative
    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<LedgerTransaction, AppError> {
        tracing::info!(account_id = %request.account_id, "starting transaction creation");
        validate_amount(request.amount)?;

        let _guard = self.lock_account(request.account_id).await;

        let account = self.account_or_not_found(request.account_id).await?;
        let available = self.available_balance(&account).await?;

        let signed = request.transaction_type.signed_amount(request.amount);
        let new_balance = checked_balance(available, signed)?;

        let transaction = self
            .transactions
            .save(LedgerTransaction {
                id: Uuid::new_v4(),
                date: Utc::now(),
                transaction_type: request.transaction_type,
                amount: signed,
                balance: new_balance,
                account_id: account.id,
            })
            .await?;

        tracing::info!(
            transaction_id = %transaction.id,
            balance = %transaction.balance,
            "transaction created"
        );
        Ok(transaction)
    }

    /// Replace the amount/type of the account's most recent transaction.
    ///
    /// The balance before that transaction is reconstructed from its own
    /// stored signed amount, then the new signed amount is applied on top.
    /// Only balance, date and amount are overwritten on the existing
    /// record; identity and account never change.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the amount is not strictly positive
    /// - `NotFound` if the account does not exist
    /// - `InvalidState` if the target is not the account's last transaction
    /// - `InsufficientFunds` if the resulting balance would be negative
    pub async fn update(
        &self,
        request: UpdateTransactionRequest,
    ) -> Result<LedgerTransaction, AppError> {
        tracing::info!(transaction_id = %request.id, "starting transaction update");
        validate_amount(request.amount)?;

        let _guard = self.lock_account(request.account_id).await;

        self.account_or_not_found(request.account_id).await?;
        let mut last = self
            .last_transaction_or_invalid(request.account_id, request.id)
            .await?;

        // The stored amount is already signed, so subtracting it yields the
        // balance as it stood before this transaction.
        let prior = last.balance - last.amount;
        let signed = request.transaction_type.signed_amount(request.amount);
        let new_balance = checked_balance(prior, signed)?;

        last.balance = new_balance;
        last.date = Utc::now();
        last.amount = signed;

        let updated = self.transactions.update(last).await?;
        tracing::info!(
            transaction_id = %updated.id,
            balance = %updated.balance,
            "transaction updated"
        );
        Ok(updated)
    }

    /// Delete a transaction; only the account's most recent one may go.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the transaction does not exist or is not the
    ///   account's last transaction
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        tracing::info!(transaction_id = %id, "starting transaction delete");

        let Some(transaction) = self.transactions.get_by_id(id).await? else {
            tracing::error!(transaction_id = %id, "no transaction found");
            return Err(AppError::InvalidState("No transaction found.".to_string()));
        };

        let _guard = self.lock_account(transaction.account_id).await;

        let last = self
            .last_transaction_or_invalid(transaction.account_id, id)
            .await?;
        self.transactions.delete(last.id).await?;

        tracing::info!(transaction_id = %id, "transaction deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<LedgerTransaction, AppError> {
        self.transactions
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction with ID {id} does not exist")))
    }

    pub async fn get_all(&self) -> Result<Vec<LedgerTransaction>, AppError> {
        self.transactions.get_all().await
    }

    pub async fn get_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<LedgerTransaction>, AppError> {
        self.account_or_not_found(account_id).await?;
        self.transactions.find_all_by_account(account_id).await
    }

    /// Balance after the account's last transaction, or its initial
    /// balance for an empty ledger.
    pub async fn available_balance(&self, account: &Account) -> Result<Decimal, AppError> {
        let last = self
            .transactions
            .find_most_recent_by_account(account.id)
            .await?;
        Ok(match last {
            Some(transaction) => transaction.balance,
            None => account.initial_balance,
        })
    }

    async fn account_or_not_found(&self, account_id: Uuid) -> Result<Account, AppError> {
        match self.accounts.get_by_id(account_id).await? {
            Some(account) => Ok(account),
            None => {
                tracing::error!(account_id = %account_id, "account does not exist");
                Err(AppError::NotFound(ACCOUNT_DOES_NOT_EXIST.to_string()))
            }
        }
    }

    async fn last_transaction_or_invalid(
        &self,
        account_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<LedgerTransaction, AppError> {
        let last = self
            .transactions
            .find_most_recent_by_account(account_id)
            .await?;
        match last {
            Some(last) if last.id == transaction_id => Ok(last),
            _ => {
                tracing::error!(
                    transaction_id = %transaction_id,
                    account_id = %account_id,
                    "transaction is not the most recent for its account"
                );
                Err(AppError::InvalidState(NOT_MOST_RECENT.to_string()))
            }
        }
    }

    /// Number of per-account lock entries currently held in the map.
    pub fn account_lock_count(&self) -> usize {
        self.account_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    async fn lock_account(&self, account_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.account_locks.lock().unwrap_or_else(|e| e.into_inner());
            // A strong count of 1 means only the map references the lock:
            // nobody holds it and nobody is waiting, so it can go. Keeps
            // the map from growing with every account ever touched.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(account_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "Amount must be positive".to_string(),
        ));
    }
    Ok(())
}

fn checked_balance(available: Decimal, signed_amount: Decimal) -> Result<Decimal, AppError> {
    let new_balance = available.checked_add(signed_amount).ok_or_else(|| {
        AppError::InvalidRequest("Amount exceeds the representable balance range".to_string())
    })?;
    if new_balance < Decimal::ZERO {
        tracing::error!(
            available = %available,
            amount = %signed_amount,
            "insufficient funds"
        );
        return Err(AppError::InsufficientFunds);
    }
    Ok(new_balance)
}
