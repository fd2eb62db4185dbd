//! PostgreSQL storage adapters.
//!
//! Row structs mirror the SQL schema (numeric type ids, NUMERIC balances)
//! and are converted to the domain records at this boundary. Every sqlx
//! error leaving this module is reclassified as `AppError::Storage`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::account::{Account, AccountType};
use crate::models::customer::{Customer, Gender, Person};
use crate::models::transaction::{LedgerTransaction, TransactionType};
use crate::store::{AccountStore, CustomerStore, TransactionStore};

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    account_number: String,
    account_type: i16,
    initial_balance: Decimal,
    status: bool,
    customer_id: Uuid,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, AppError> {
        Ok(Account {
            id: self.id,
            account_number: self.account_number,
            account_type: AccountType::from_id(self.account_type)
                .map_err(|_| corrupt_row("account_type", self.account_type))?,
            initial_balance: self.initial_balance,
            status: self.status,
            customer_id: self.customer_id,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    date: DateTime<Utc>,
    transaction_type: i16,
    amount: Decimal,
    balance: Decimal,
    account_id: Uuid,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<LedgerTransaction, AppError> {
        Ok(LedgerTransaction {
            id: self.id,
            date: self.date,
            transaction_type: TransactionType::from_id(self.transaction_type)
                .map_err(|_| corrupt_row("transaction_type", self.transaction_type))?,
            amount: self.amount,
            balance: self.balance,
            account_id: self.account_id,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    customer_ref: String,
    password: String,
    status: bool,
    name: String,
    gender: i16,
    age: i32,
    identification: String,
    address: String,
    phone: String,
}

impl CustomerRow {
    fn into_customer(self) -> Result<Customer, AppError> {
        Ok(Customer {
            id: self.id,
            customer_ref: self.customer_ref,
            password: self.password,
            status: self.status,
            person: Person {
                name: self.name,
                gender: Gender::from_id(self.gender)
                    .map_err(|_| corrupt_row("gender", self.gender))?,
                age: self.age,
                identification: self.identification,
                address: self.address,
                phone: self.phone,
            },
        })
    }
}

fn corrupt_row(column: &str, value: i16) -> AppError {
    AppError::Storage(anyhow::anyhow!(
        "stored {column} id {value} is outside the known lookup"
    ))
}

/// Account store backed by the `accounts` table.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: DbPool,
}

impl PgAccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn save(&self, account: Account) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, account_number, account_type, initial_balance, status, customer_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_number, account_type, initial_balance, status, customer_id
            "#,
        )
        .bind(account.id)
        .bind(&account.account_number)
        .bind(account.account_type.id())
        .bind(account.initial_balance)
        .bind(account.status)
        .bind(account.customer_id)
        .fetch_one(&self.pool)
        .await?;

        row.into_account()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, account_number, account_type, initial_balance, status, customer_id \
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn update(&self, account: Account) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET account_type = $2, initial_balance = $3, status = $4
            WHERE id = $1
            RETURNING id, account_number, account_type, initial_balance, status, customer_id
            "#,
        )
        .bind(account.id)
        .bind(account.account_type.id())
        .bind(account.initial_balance)
        .bind(account.status)
        .fetch_one(&self.pool)
        .await?;

        row.into_account()
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_account_number(&self, number: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, account_number, account_type, initial_balance, status, customer_id \
             FROM accounts WHERE account_number = $1",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, account_number, account_type, initial_balance, status, customer_id \
             FROM accounts WHERE customer_id = $1 ORDER BY account_number",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn get_all(&self) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, account_number, account_type, initial_balance, status, customer_id \
             FROM accounts ORDER BY account_number",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn delete_with_transactions(&self, account_id: Uuid) -> Result<(), AppError> {
        // Both deletes commit or roll back together
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM transactions WHERE account_id = $1")
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Transaction store backed by the `transactions` table.
#[derive(Clone)]
pub struct PgTransactionStore {
    pool: DbPool,
}

impl PgTransactionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn save(&self, tx: LedgerTransaction) -> Result<LedgerTransaction, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (id, date, transaction_type, amount, balance, account_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, date, transaction_type, amount, balance, account_id
            "#,
        )
        .bind(tx.id)
        .bind(tx.date)
        .bind(tx.transaction_type.id())
        .bind(tx.amount)
        .bind(tx.balance)
        .bind(tx.account_id)
        .fetch_one(&self.pool)
        .await?;

        row.into_transaction()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<LedgerTransaction>, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, date, transaction_type, amount, balance, account_id \
             FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    async fn update(&self, tx: LedgerTransaction) -> Result<LedgerTransaction, AppError> {
        // Only the recomputed fields change; identity and account are fixed.
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
            SET date = $2, transaction_type = $3, amount = $4, balance = $5
            WHERE id = $1
            RETURNING id, date, transaction_type, amount, balance, account_id
            "#,
        )
        .bind(tx.id)
        .bind(tx.date)
        .bind(tx.transaction_type.id())
        .bind(tx.amount)
        .bind(tx.balance)
        .fetch_one(&self.pool)
        .await?;

        row.into_transaction()
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_all_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<LedgerTransaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, date, transaction_type, amount, balance, account_id \
             FROM transactions WHERE account_id = $1 ORDER BY date",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(TransactionRow::into_transaction)
            .collect()
    }

    async fn find_most_recent_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<LedgerTransaction>, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, date, transaction_type, amount, balance, account_id \
             FROM transactions WHERE account_id = $1 ORDER BY date DESC LIMIT 1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    async fn get_all(&self) -> Result<Vec<LedgerTransaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, date, transaction_type, amount, balance, account_id \
             FROM transactions ORDER BY date",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(TransactionRow::into_transaction)
            .collect()
    }
}

/// Customer store backed by the `customers` table.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: DbPool,
}

impl PgCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const CUSTOMER_COLUMNS: &str = "id, customer_ref, password, status, name, gender, age, \
                                identification, address, phone";

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn save(&self, customer: Customer) -> Result<Customer, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customers ({CUSTOMER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer.id)
        .bind(&customer.customer_ref)
        .bind(&customer.password)
        .bind(customer.status)
        .bind(&customer.person.name)
        .bind(customer.person.gender.id())
        .bind(customer.person.age)
        .bind(&customer.person.identification)
        .bind(&customer.person.address)
        .bind(&customer.person.phone)
        .fetch_one(&self.pool)
        .await?;

        row.into_customer()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn update(&self, customer: Customer) -> Result<Customer, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customers \
             SET customer_ref = $2, password = $3, status = $4, name = $5, gender = $6, \
                 age = $7, identification = $8, address = $9, phone = $10 \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer.id)
        .bind(&customer.customer_ref)
        .bind(&customer.password)
        .bind(customer.status)
        .bind(&customer.person.name)
        .bind(customer.person.gender.id())
        .bind(customer.person.age)
        .bind(&customer.person.identification)
        .bind(&customer.person.address)
        .bind(&customer.person.phone)
        .fetch_one(&self.pool)
        .await?;

        row.into_customer()
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_identification(
        &self,
        identification: &str,
    ) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE identification = $1"
        ))
        .bind(identification)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY customer_ref"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CustomerRow::into_customer).collect()
    }
}
