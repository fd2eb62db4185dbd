//! Storage ports and adapters.
//!
//! The services talk to storage through these traits only. The Postgres
//! adapter backs the running service; the in-memory adapter backs the test
//! suite and broker-less local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::account::Account;
use crate::models::customer::Customer;
use crate::models::transaction::LedgerTransaction;

pub mod memory;
pub mod postgres;

/// Account persistence port.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn save(&self, account: Account) -> Result<Account, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;
    async fn update(&self, account: Account) -> Result<Account, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, AppError>;
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Account>, AppError>;
    async fn get_all(&self) -> Result<Vec<Account>, AppError>;

    /// Delete the account together with all of its transactions as one
    /// atomic unit: either everything is removed or nothing is.
    async fn delete_with_transactions(&self, account_id: Uuid) -> Result<(), AppError>;
}

/// Transaction persistence port.
///
/// `find_most_recent_by_account` is the read the ledger engine builds its
/// whole invariant on: it must return the transaction with the latest
/// creation timestamp for the account, or None for an empty ledger.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn save(&self, tx: LedgerTransaction) -> Result<LedgerTransaction, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<LedgerTransaction>, AppError>;
    async fn update(&self, tx: LedgerTransaction) -> Result<LedgerTransaction, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn find_all_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<LedgerTransaction>, AppError>;
    async fn find_most_recent_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<LedgerTransaction>, AppError>;
    async fn get_all(&self) -> Result<Vec<LedgerTransaction>, AppError>;
}

/// Customer persistence port.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn save(&self, customer: Customer) -> Result<Customer, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError>;
    async fn update(&self, customer: Customer) -> Result<Customer, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn find_by_identification(
        &self,
        identification: &str,
    ) -> Result<Option<Customer>, AppError>;
    async fn get_all(&self) -> Result<Vec<Customer>, AppError>;
}
