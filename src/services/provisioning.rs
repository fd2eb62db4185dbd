//! Default-account provisioning from customer-created events.
//!
//! The consumer drains the customer event queue and opens the default
//! account for each new customer: account number = phone number, savings
//! type, zero initial balance, active.
//!
//! Retry policy: business rejections are terminal. A `Conflict` means the
//! account already exists (duplicate delivery under at-least-once
//! semantics) and is dropped quietly; an `InvalidRequest` can never
//! succeed on redelivery. Storage and unexpected failures are retried a
//! bounded number of times, then the event is rejected.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::messaging::CustomerCreated;
use crate::models::account::{Account, AccountType, CreateAccountRequest};
use crate::services::account_service::AccountService;

/// Account type assigned to automatically provisioned accounts.
pub const DEFAULT_ACCOUNT_TYPE: AccountType = AccountType::Savings;

pub struct ProvisioningConsumer {
    accounts: Arc<AccountService>,
    max_retries: u32,
}

impl ProvisioningConsumer {
    pub fn new(accounts: Arc<AccountService>, max_retries: u32) -> Self {
        Self {
            accounts,
            max_retries: max_retries.max(1),
        }
    }

    /// Drain the queue until the publisher side is dropped.
    pub async fn run(self, mut receiver: mpsc::Receiver<CustomerCreated>) {
        while let Some(event) = receiver.recv().await {
            self.handle(&event).await;
        }
        tracing::info!("customer event queue closed, provisioning consumer stopping");
    }

    /// Process one delivery, applying the retry policy.
    pub async fn handle(&self, event: &CustomerCreated) {
        tracing::info!(customer_id = %event.customer_id, "received customer-created event");

        for attempt in 1..=self.max_retries {
            match self.provision(event).await {
                Ok(account) => {
                    tracing::info!(
                        customer_id = %event.customer_id,
                        account_id = %account.id,
                        "default account provisioned"
                    );
                    return;
                }
                Err(AppError::Conflict(_)) => {
                    // Duplicate delivery; the account is already there.
                    tracing::info!(
                        customer_id = %event.customer_id,
                        "account already provisioned, dropping duplicate event"
                    );
                    return;
                }
                Err(AppError::InvalidRequest(msg)) => {
                    tracing::error!(
                        customer_id = %event.customer_id,
                        "rejecting unprovisionable event: {msg}"
                    );
                    return;
                }
                Err(err) => {
                    tracing::error!(
                        customer_id = %event.customer_id,
                        attempt,
                        "provisioning attempt failed: {err}"
                    );
                }
            }
        }

        tracing::error!(
            customer_id = %event.customer_id,
            "rejecting customer-created event after {} attempts",
            self.max_retries
        );
    }

    async fn provision(&self, event: &CustomerCreated) -> Result<Account, AppError> {
        self.accounts
            .create(CreateAccountRequest {
                account_number: event.phone_number.clone(),
                account_type: DEFAULT_ACCOUNT_TYPE,
                initial_balance: Decimal::ZERO,
                customer_id: event.customer_id,
            })
            .await
    }
}
