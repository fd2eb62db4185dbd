//! Shared test fixture: services wired over the in-memory store.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use ledger_service::models::account::{Account, AccountType, CreateAccountRequest};
use ledger_service::services::account_service::AccountService;
use ledger_service::services::ledger::LedgerEngine;
use ledger_service::store::memory::MemoryStore;
use ledger_service::store::{AccountStore, TransactionStore};

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub accounts: Arc<AccountService>,
    pub ledger: Arc<LedgerEngine>,
}

pub fn setup() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let account_store: Arc<dyn AccountStore> = store.clone();
    let transaction_store: Arc<dyn TransactionStore> = store.clone();

    let accounts = Arc::new(AccountService::new(
        account_store.clone(),
        transaction_store.clone(),
    ));
    let ledger = Arc::new(LedgerEngine::new(transaction_store, account_store));

    TestContext {
        store,
        accounts,
        ledger,
    }
}

impl TestContext {
    /// Create a savings account with the given number and starting balance.
    pub async fn open_account(&self, number: &str, initial_balance: Decimal) -> Account {
        self.accounts
            .create(CreateAccountRequest {
                account_number: number.to_string(),
                account_type: AccountType::Savings,
                initial_balance,
                customer_id: Uuid::new_v4(),
            })
            .await
            .expect("account creation should succeed")
    }
}
