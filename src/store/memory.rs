//! In-memory storage adapter.
//!
//! Implements all three ports over a single mutex-guarded state map. Used
//! by the test suite and for running the service without PostgreSQL.
//!
//! Ordering: `find_most_recent_by_account` sorts by creation timestamp
//! with an insertion sequence as tie-breaker, so two transactions saved
//! within the same clock tick still have a well-defined "last".

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::account::Account;
use crate::models::customer::Customer;
use crate::models::transaction::LedgerTransaction;
use crate::store::{AccountStore, CustomerStore, TransactionStore};

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    transactions: HashMap<Uuid, LedgerTransaction>,
    customers: HashMap<Uuid, Customer>,
    /// Insertion order of transactions, used to break timestamp ties
    tx_seq: HashMap<Uuid, u64>,
    next_seq: u64,
}

/// Mutex-guarded in-memory store implementing every persistence port.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        // A poisoned lock only means another test thread panicked mid-write;
        // the state itself is still usable.
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn save(&self, account: Account) -> Result<Account, AppError> {
        self.with_state(|s| {
            s.accounts.insert(account.id, account.clone());
            Ok(account)
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        self.with_state(|s| Ok(s.accounts.get(&id).cloned()))
    }

    async fn update(&self, account: Account) -> Result<Account, AppError> {
        self.with_state(|s| {
            s.accounts.insert(account.id, account.clone());
            Ok(account)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.with_state(|s| {
            s.accounts.remove(&id);
            Ok(())
        })
    }

    async fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, AppError> {
        self.with_state(|s| {
            Ok(s.accounts
                .values()
                .find(|a| a.account_number == number)
                .cloned())
        })
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Account>, AppError> {
        self.with_state(|s| {
            let mut accounts: Vec<Account> = s
                .accounts
                .values()
                .filter(|a| a.customer_id == customer_id)
                .cloned()
                .collect();
            accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
            Ok(accounts)
        })
    }

    async fn get_all(&self) -> Result<Vec<Account>, AppError> {
        self.with_state(|s| {
            let mut accounts: Vec<Account> = s.accounts.values().cloned().collect();
            accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
            Ok(accounts)
        })
    }

    async fn delete_with_transactions(&self, account_id: Uuid) -> Result<(), AppError> {
        // Single critical section, so the cascade is all-or-nothing
        self.with_state(|s| {
            let ids: Vec<Uuid> = s
                .transactions
                .values()
                .filter(|t| t.account_id == account_id)
                .map(|t| t.id)
                .collect();
            for id in ids {
                s.transactions.remove(&id);
                s.tx_seq.remove(&id);
            }
            s.accounts.remove(&account_id);
            Ok(())
        })
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn save(&self, tx: LedgerTransaction) -> Result<LedgerTransaction, AppError> {
        self.with_state(|s| {
            let seq = s.next_seq;
            s.next_seq += 1;
            s.tx_seq.insert(tx.id, seq);
            s.transactions.insert(tx.id, tx.clone());
            Ok(tx)
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<LedgerTransaction>, AppError> {
        self.with_state(|s| Ok(s.transactions.get(&id).cloned()))
    }

    async fn update(&self, tx: LedgerTransaction) -> Result<LedgerTransaction, AppError> {
        self.with_state(|s| {
            s.transactions.insert(tx.id, tx.clone());
            Ok(tx)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.with_state(|s| {
            s.transactions.remove(&id);
            s.tx_seq.remove(&id);
            Ok(())
        })
    }

    async fn find_all_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<LedgerTransaction>, AppError> {
        self.with_state(|s| {
            let mut txs: Vec<LedgerTransaction> = s
                .transactions
                .values()
                .filter(|t| t.account_id == account_id)
                .cloned()
                .collect();
            txs.sort_by_key(|t| (t.date, s.tx_seq.get(&t.id).copied().unwrap_or(0)));
            Ok(txs)
        })
    }

    async fn find_most_recent_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<LedgerTransaction>, AppError> {
        self.with_state(|s| {
            Ok(s.transactions
                .values()
                .filter(|t| t.account_id == account_id)
                .max_by_key(|t| (t.date, s.tx_seq.get(&t.id).copied().unwrap_or(0)))
                .cloned())
        })
    }

    async fn get_all(&self) -> Result<Vec<LedgerTransaction>, AppError> {
        self.with_state(|s| {
            let mut txs: Vec<LedgerTransaction> = s.transactions.values().cloned().collect();
            txs.sort_by_key(|t| (t.date, s.tx_seq.get(&t.id).copied().unwrap_or(0)));
            Ok(txs)
        })
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn save(&self, customer: Customer) -> Result<Customer, AppError> {
        self.with_state(|s| {
            s.customers.insert(customer.id, customer.clone());
            Ok(customer)
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        self.with_state(|s| Ok(s.customers.get(&id).cloned()))
    }

    async fn update(&self, customer: Customer) -> Result<Customer, AppError> {
        self.with_state(|s| {
            s.customers.insert(customer.id, customer.clone());
            Ok(customer)
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.with_state(|s| {
            s.customers.remove(&id);
            Ok(())
        })
    }

    async fn find_by_identification(
        &self,
        identification: &str,
    ) -> Result<Option<Customer>, AppError> {
        self.with_state(|s| {
            Ok(s.customers
                .values()
                .find(|c| c.person.identification == identification)
                .cloned())
        })
    }

    async fn get_all(&self) -> Result<Vec<Customer>, AppError> {
        self.with_state(|s| {
            let mut customers: Vec<Customer> = s.customers.values().cloned().collect();
            customers.sort_by(|a, b| a.customer_ref.cmp(&b.customer_ref));
            Ok(customers)
        })
    }
}
