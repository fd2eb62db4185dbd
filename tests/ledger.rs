//! Ledger engine behavior: balance chains, the last-transaction rule and
//! insufficient-funds rejection.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use ledger_service::error::AppError;
use ledger_service::models::transaction::{
    CreateTransactionRequest, TransactionType, UpdateTransactionRequest,
};
use ledger_service::store::TransactionStore;

fn deposit(account_id: Uuid, amount: Decimal) -> CreateTransactionRequest {
    CreateTransactionRequest {
        account_id,
        transaction_type: TransactionType::Deposit,
        amount,
    }
}

fn withdrawal(account_id: Uuid, amount: Decimal) -> CreateTransactionRequest {
    CreateTransactionRequest {
        account_id,
        transaction_type: TransactionType::Withdrawal,
        amount,
    }
}

#[tokio::test]
async fn round_trip_deposit_withdraw_amend_delete() {
    let ctx = common::setup();
    let account = ctx.open_account("2254871234", dec!(1000.00)).await;

    let dep = ctx.ledger.create(deposit(account.id, dec!(500.00))).await.unwrap();
    assert_eq!(dep.balance, dec!(1500.00));
    assert_eq!(dep.amount, dec!(500.00));

    let wd = ctx
        .ledger
        .create(withdrawal(account.id, dec!(200.00)))
        .await
        .unwrap();
    assert_eq!(wd.balance, dec!(1300.00));
    // Withdrawals are stored sign-adjusted
    assert_eq!(wd.amount, dec!(-200.00));

    let amended = ctx
        .ledger
        .update(UpdateTransactionRequest {
            id: wd.id,
            account_id: account.id,
            transaction_type: TransactionType::Withdrawal,
            amount: dec!(100.00),
        })
        .await
        .unwrap();
    assert_eq!(amended.id, wd.id);
    assert_eq!(amended.balance, dec!(1400.00));
    assert_eq!(amended.amount, dec!(-100.00));
    assert_eq!(ctx.ledger.available_balance(&account).await.unwrap(), dec!(1400.00));

    ctx.ledger.delete(wd.id).await.unwrap();

    // The ledger reverts to the deposit as the most recent transaction
    let last = ctx
        .store
        .find_most_recent_by_account(account.id)
        .await
        .unwrap()
        .expect("deposit should remain");
    assert_eq!(last.id, dep.id);
    assert_eq!(last.balance, dec!(1500.00));
    assert_eq!(ctx.ledger.available_balance(&account).await.unwrap(), dec!(1500.00));
}

#[tokio::test]
async fn balance_chain_invariant_holds() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000001", dec!(100.00)).await;

    ctx.ledger.create(deposit(account.id, dec!(50.00))).await.unwrap();
    ctx.ledger
        .create(withdrawal(account.id, dec!(30.00)))
        .await
        .unwrap();
    ctx.ledger.create(deposit(account.id, dec!(5.50))).await.unwrap();
    ctx.ledger
        .create(withdrawal(account.id, dec!(125.50)))
        .await
        .unwrap();

    let chain = ctx.ledger.get_by_account(account.id).await.unwrap();
    assert_eq!(chain.len(), 4);

    let mut running = account.initial_balance;
    for tx in &chain {
        running += tx.amount;
        assert_eq!(tx.balance, running, "stored balance must equal prefix sum");
        assert!(tx.balance >= Decimal::ZERO);
    }
    assert_eq!(running, dec!(0.00));
}

#[tokio::test]
async fn insufficient_funds_leaves_ledger_unchanged() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000002", dec!(1000.00)).await;

    let err = ctx
        .ledger
        .create(withdrawal(account.id, dec!(2000.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds));

    // No partial state was persisted
    assert!(ctx.ledger.get_by_account(account.id).await.unwrap().is_empty());
    assert_eq!(
        ctx.ledger.available_balance(&account).await.unwrap(),
        dec!(1000.00)
    );
}

#[tokio::test]
async fn insufficient_funds_on_update_leaves_last_intact() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000003", dec!(100.00)).await;
    let wd = ctx
        .ledger
        .create(withdrawal(account.id, dec!(40.00)))
        .await
        .unwrap();

    let err = ctx
        .ledger
        .update(UpdateTransactionRequest {
            id: wd.id,
            account_id: account.id,
            transaction_type: TransactionType::Withdrawal,
            amount: dec!(150.00),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientFunds));

    let last = ctx.ledger.get_by_id(wd.id).await.unwrap();
    assert_eq!(last.amount, dec!(-40.00));
    assert_eq!(last.balance, dec!(60.00));
}

#[tokio::test]
async fn only_last_transaction_can_be_updated() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000004", dec!(0.00)).await;

    let first = ctx.ledger.create(deposit(account.id, dec!(10.00))).await.unwrap();
    let second = ctx.ledger.create(deposit(account.id, dec!(20.00))).await.unwrap();

    let err = ctx
        .ledger
        .update(UpdateTransactionRequest {
            id: first.id,
            account_id: account.id,
            transaction_type: TransactionType::Deposit,
            amount: dec!(99.00),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    // Storage unchanged
    let stored_first = ctx.ledger.get_by_id(first.id).await.unwrap();
    assert_eq!(stored_first.amount, dec!(10.00));
    assert_eq!(stored_first.balance, dec!(10.00));
    let stored_second = ctx.ledger.get_by_id(second.id).await.unwrap();
    assert_eq!(stored_second.balance, dec!(30.00));
}

#[tokio::test]
async fn only_last_transaction_can_be_deleted() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000005", dec!(0.00)).await;

    let first = ctx.ledger.create(deposit(account.id, dec!(10.00))).await.unwrap();
    ctx.ledger.create(deposit(account.id, dec!(20.00))).await.unwrap();

    let err = ctx.ledger.delete(first.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(ctx.ledger.get_by_account(account.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_unknown_transaction_is_invalid_state() {
    let ctx = common::setup();
    let err = ctx.ledger.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
}

#[tokio::test]
async fn create_requires_existing_account() {
    let ctx = common::setup();
    let err = ctx
        .ledger
        .create(deposit(Uuid::new_v4(), dec!(10.00)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_requires_existing_account() {
    let ctx = common::setup();
    let err = ctx
        .ledger
        .update(UpdateTransactionRequest {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            transaction_type: TransactionType::Deposit,
            amount: dec!(10.00),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn amount_must_be_strictly_positive() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000006", dec!(100.00)).await;

    for amount in [dec!(0.00), dec!(-5.00)] {
        let err = ctx
            .ledger
            .create(deposit(account.id, amount))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }
}

#[tokio::test]
async fn withdrawal_down_to_exactly_zero_is_allowed() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000007", dec!(75.00)).await;

    let wd = ctx
        .ledger
        .create(withdrawal(account.id, dec!(75.00)))
        .await
        .unwrap();
    assert_eq!(wd.balance, dec!(0.00));
}

#[tokio::test]
async fn deposit_overflowing_the_balance_is_rejected() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000009", Decimal::MAX).await;

    let err = ctx
        .ledger
        .create(deposit(account.id, Decimal::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRequest(_)));

    // The failed deposit was never persisted
    assert!(ctx.ledger.get_by_account(account.id).await.unwrap().is_empty());
    assert_eq!(
        ctx.ledger.available_balance(&account).await.unwrap(),
        Decimal::MAX
    );
}

#[tokio::test]
async fn released_account_locks_are_evicted() {
    let ctx = common::setup();

    for number in ["9000000010", "9000000011", "9000000012"] {
        let account = ctx.open_account(number, dec!(0.00)).await;
        ctx.ledger.create(deposit(account.id, dec!(10.00))).await.unwrap();
    }

    // Each call evicts the unheld locks left behind by earlier accounts,
    // so the map does not grow with every account ever touched.
    assert_eq!(ctx.ledger.account_lock_count(), 1);
}

#[tokio::test]
async fn concurrent_creates_on_one_account_serialize() {
    let ctx = common::setup();
    let account = ctx.open_account("9000000008", dec!(0.00)).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let ledger = ctx.ledger.clone();
        let account_id = account.id;
        handles.push(tokio::spawn(async move {
            ledger.create(deposit(account_id, dec!(10.00))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Every create observed the balance left by the previous one
    assert_eq!(
        ctx.ledger.available_balance(&account).await.unwrap(),
        dec!(200.00)
    );
    let chain = ctx.ledger.get_by_account(account.id).await.unwrap();
    let mut running = Decimal::ZERO;
    for tx in &chain {
        running += tx.amount;
        assert_eq!(tx.balance, running);
    }
}
