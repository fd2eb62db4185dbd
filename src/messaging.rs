//! Messaging boundary between the customer registry and the ledger side.
//!
//! Registering a customer publishes a `CustomerCreated` event; an
//! asynchronous consumer provisions the default account from it. The
//! boundary is an explicit queue with at-least-once delivery semantics:
//! duplicate deliveries are absorbed by the account-number `Conflict`
//! rejection, which the consumer treats as terminal.
//!
//! The in-process queue here is a tokio mpsc channel. A broker-backed
//! deployment only needs another `CustomerEventPublisher` implementation
//! plus a receiver loop feeding the same consumer; the payload shape is
//! the wire contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AppError;

/// Event published when a customer is registered.
///
/// The payload carries exactly what account provisioning needs: the owning
/// customer and the phone number that becomes the account number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCreated {
    pub customer_id: Uuid,
    pub phone_number: String,
}

/// Outbound port for customer events.
#[async_trait]
pub trait CustomerEventPublisher: Send + Sync {
    async fn publish(&self, event: CustomerCreated) -> Result<(), AppError>;
}

/// In-process event queue over a bounded tokio channel.
pub struct InProcessQueue {
    sender: mpsc::Sender<CustomerCreated>,
}

impl InProcessQueue {
    /// Create the queue, returning the publisher half and the receiver the
    /// provisioning consumer drains.
    pub fn new(depth: usize) -> (Self, mpsc::Receiver<CustomerCreated>) {
        let (sender, receiver) = mpsc::channel(depth);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl CustomerEventPublisher for InProcessQueue {
    async fn publish(&self, event: CustomerCreated) -> Result<(), AppError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| AppError::Unexpected(anyhow::anyhow!("event queue closed: {e}")))
    }
}
