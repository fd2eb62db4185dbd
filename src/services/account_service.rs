//! Account lifecycle rules: creation, update, deletion.
//!
//! This service owns the account-level business rules and never computes
//! balances; that is the ledger engine's job. Deleting an account removes
//! its transactions first, bypassing the ledger's last-transaction rule
//! because the deletions are driven by the owning account going away.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::account::{Account, CreateAccountRequest};
use crate::store::{AccountStore, TransactionStore};

pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    transactions: Arc<dyn TransactionStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            accounts,
            transactions,
        }
    }

    /// Create an account.
    ///
    /// The status sent by the caller is irrelevant: accounts always start
    /// active.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the account number is not 10-20 characters or
    ///   the initial balance is negative
    /// - `Conflict` if the account number is already in use
    pub async fn create(&self, request: CreateAccountRequest) -> Result<Account, AppError> {
        tracing::info!(customer_id = %request.customer_id, "starting account creation");
        validate_account_number(&request.account_number)?;

        if request.initial_balance < Decimal::ZERO {
            return Err(AppError::InvalidRequest(
                "Initial balance must not be negative".to_string(),
            ));
        }

        if self
            .accounts
            .find_by_account_number(&request.account_number)
            .await?
            .is_some()
        {
            tracing::error!(
                account_number = %request.account_number,
                "account number already in use"
            );
            return Err(AppError::Conflict("Account already exists".to_string()));
        }

        let account = self
            .accounts
            .save(Account {
                id: Uuid::new_v4(),
                account_number: request.account_number,
                account_type: request.account_type,
                initial_balance: request.initial_balance,
                // Accounts are always created active
                status: true,
                customer_id: request.customer_id,
            })
            .await?;

        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Update an account's mutable fields (type, initial balance, status).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the account does not exist
    /// - `InvalidState` if the request changes the account number or the
    ///   owning customer, which are immutable
    pub async fn update(&self, account: Account) -> Result<Account, AppError> {
        tracing::info!(account_id = %account.id, "starting account update");

        let existing = self.get_by_id(account.id).await?;
        if existing.account_number != account.account_number
            || existing.customer_id != account.customer_id
        {
            tracing::error!(
                account_id = %account.id,
                "attempted to modify immutable account fields"
            );
            return Err(AppError::InvalidState(
                "Cannot modify account number or customer id".to_string(),
            ));
        }

        let updated = self.accounts.update(account).await?;
        tracing::info!(account_id = %updated.id, "account updated");
        Ok(updated)
    }

    /// Delete an account together with its transaction history.
    ///
    /// The cascade is one atomic storage unit: the dependent transactions
    /// and the account itself are removed together or not at all.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the account does not exist
    pub async fn delete(&self, account_id: Uuid) -> Result<(), AppError> {
        tracing::info!(account_id = %account_id, "starting account deletion");

        let account = self.get_by_id(account_id).await?;

        let transactions = self.transactions.find_all_by_account(account.id).await?;
        if !transactions.is_empty() {
            tracing::info!(
                account_id = %account_id,
                count = transactions.len(),
                "deleting dependent transactions with the account"
            );
        }

        self.accounts.delete_with_transactions(account_id).await?;
        tracing::info!(account_id = %account_id, "account deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, account_id: Uuid) -> Result<Account, AppError> {
        self.accounts.get_by_id(account_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Account with ID {account_id} does not exist"))
        })
    }

    pub async fn get_all(&self) -> Result<Vec<Account>, AppError> {
        self.accounts.get_all().await
    }

    pub async fn get_by_customer(&self, customer_id: Uuid) -> Result<Vec<Account>, AppError> {
        self.accounts.find_by_customer(customer_id).await
    }
}

fn validate_account_number(account_number: &str) -> Result<(), AppError> {
    let len = account_number.chars().count();
    if !(10..=20).contains(&len) {
        return Err(AppError::InvalidRequest(
            "Account number must be 10 to 20 characters".to_string(),
        ));
    }
    Ok(())
}
