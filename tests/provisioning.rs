//! Customer registration and the asynchronous default-account hand-off.

mod common;

use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use ledger_service::error::AppError;
use ledger_service::messaging::{CustomerCreated, InProcessQueue};
use ledger_service::models::customer::{CreateCustomerRequest, Gender, Person};
use ledger_service::services::customer_service::CustomerService;
use ledger_service::services::provisioning::{DEFAULT_ACCOUNT_TYPE, ProvisioningConsumer};
use ledger_service::store::CustomerStore;

fn person(identification: &str, phone: &str) -> Person {
    Person {
        name: "Jose Lema".to_string(),
        gender: Gender::Male,
        age: 34,
        identification: identification.to_string(),
        address: "Otavalo sn y principal".to_string(),
        phone: phone.to_string(),
    }
}

fn registration(identification: &str, phone: &str) -> CreateCustomerRequest {
    CreateCustomerRequest {
        customer_ref: format!("client-{identification}"),
        password: "1234".to_string(),
        status: true,
        person: person(identification, phone),
    }
}

#[tokio::test]
async fn registering_a_customer_publishes_the_handoff_event() {
    let ctx = common::setup();
    let (queue, mut receiver) = InProcessQueue::new(8);
    let customers = CustomerService::new(ctx.store.clone(), Arc::new(queue));

    let customer = customers
        .create(registration("1716279538", "0982547851"))
        .await
        .unwrap();

    let event = receiver.recv().await.expect("event should be published");
    assert_eq!(
        event,
        CustomerCreated {
            customer_id: customer.id,
            phone_number: "0982547851".to_string(),
        }
    );
}

#[tokio::test]
async fn handoff_provisions_the_default_account() {
    let ctx = common::setup();
    let (queue, mut receiver) = InProcessQueue::new(8);
    let customers = CustomerService::new(ctx.store.clone(), Arc::new(queue));
    let consumer = ProvisioningConsumer::new(ctx.accounts.clone(), 3);

    let customer = customers
        .create(registration("1716279538", "0982547851"))
        .await
        .unwrap();
    let event = receiver.recv().await.unwrap();
    consumer.handle(&event).await;

    let owned = ctx.accounts.get_by_customer(customer.id).await.unwrap();
    assert_eq!(owned.len(), 1);
    let account = &owned[0];
    assert_eq!(account.account_number, "0982547851");
    assert_eq!(account.account_type, DEFAULT_ACCOUNT_TYPE);
    assert_eq!(account.initial_balance, dec!(0.00));
    assert!(account.status);
}

#[tokio::test]
async fn duplicate_delivery_is_terminal_and_idempotent() {
    let ctx = common::setup();
    let (queue, mut receiver) = InProcessQueue::new(8);
    let customers = CustomerService::new(ctx.store.clone(), Arc::new(queue));
    let consumer = ProvisioningConsumer::new(ctx.accounts.clone(), 3);

    let customer = customers
        .create(registration("1716279538", "0982547851"))
        .await
        .unwrap();
    let event = receiver.recv().await.unwrap();

    // At-least-once delivery: the same event arrives twice
    consumer.handle(&event).await;
    consumer.handle(&event).await;

    let owned = ctx.accounts.get_by_customer(customer.id).await.unwrap();
    assert_eq!(owned.len(), 1, "conflict rejection keeps the account unique");
}

#[tokio::test]
async fn unprovisionable_phone_is_dropped_without_account() {
    let ctx = common::setup();
    let consumer = ProvisioningConsumer::new(ctx.accounts.clone(), 3);

    // Phone shorter than a valid account number; terminal rejection
    let event = CustomerCreated {
        customer_id: Uuid::new_v4(),
        phone_number: "12345".to_string(),
    };
    consumer.handle(&event).await;

    let owned = ctx
        .accounts
        .get_by_customer(event.customer_id)
        .await
        .unwrap();
    assert!(owned.is_empty());
}

#[tokio::test]
async fn duplicate_identification_is_a_conflict() {
    let ctx = common::setup();
    let (queue, _receiver) = InProcessQueue::new(8);
    let customers = CustomerService::new(ctx.store.clone(), Arc::new(queue));

    customers
        .create(registration("1716279538", "0982547851"))
        .await
        .unwrap();
    let err = customers
        .create(registration("1716279538", "0999999999"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(customers.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn customer_update_and_delete() {
    let ctx = common::setup();
    let (queue, _receiver) = InProcessQueue::new(8);
    let customers = CustomerService::new(ctx.store.clone(), Arc::new(queue));

    let customer = customers
        .create(registration("1716279538", "0982547851"))
        .await
        .unwrap();

    let updated = customers
        .update(ledger_service::models::customer::UpdateCustomerRequest {
            id: customer.id,
            customer_ref: customer.customer_ref.clone(),
            password: "5678".to_string(),
            status: false,
            person: person("1716279538", "0990000000"),
        })
        .await
        .unwrap();
    assert!(!updated.status);
    assert_eq!(updated.person.phone, "0990000000");

    customers.delete(customer.id).await.unwrap();
    assert!(matches!(
        customers.get_by_id(customer.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(ctx
        .store
        .find_by_identification("1716279538")
        .await
        .unwrap()
        .is_none());
}
