//! Customer registry: registration, update, deletion.
//!
//! Registration publishes a `CustomerCreated` event for the asynchronous
//! account provisioning hand-off. A publish failure does not fail the
//! registration; it is logged and left to operational recovery, since
//! delivery guarantees belong to the queue collaborator.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::messaging::{CustomerCreated, CustomerEventPublisher};
use crate::models::customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest};
use crate::store::CustomerStore;

pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    events: Arc<dyn CustomerEventPublisher>,
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerStore>, events: Arc<dyn CustomerEventPublisher>) -> Self {
        Self { customers, events }
    }

    /// Register a customer and announce the registration.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the identification is already registered
    pub async fn create(&self, request: CreateCustomerRequest) -> Result<Customer, AppError> {
        tracing::info!(customer_ref = %request.customer_ref, "starting customer registration");

        if self
            .customers
            .find_by_identification(&request.person.identification)
            .await?
            .is_some()
        {
            tracing::error!(
                identification = %request.person.identification,
                "identification already registered"
            );
            return Err(AppError::Conflict("Customer already exists".to_string()));
        }

        let customer = self
            .customers
            .save(Customer {
                id: Uuid::new_v4(),
                customer_ref: request.customer_ref,
                password: request.password,
                status: request.status,
                person: request.person,
            })
            .await?;
        tracing::info!(customer_id = %customer.id, "customer registered");

        let event = CustomerCreated {
            customer_id: customer.id,
            phone_number: customer.person.phone.clone(),
        };
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(
                customer_id = %customer.id,
                "failed to publish customer-created event: {err}"
            );
        }

        Ok(customer)
    }

    /// Update a customer's person data and status.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the customer does not exist
    pub async fn update(&self, request: UpdateCustomerRequest) -> Result<Customer, AppError> {
        tracing::info!(customer_id = %request.id, "starting customer update");

        let existing = self.get_by_id(request.id).await?;
        let updated = self
            .customers
            .update(Customer {
                id: existing.id,
                customer_ref: request.customer_ref,
                password: request.password,
                status: request.status,
                person: request.person,
            })
            .await?;

        tracing::info!(customer_id = %updated.id, "customer updated");
        Ok(updated)
    }

    /// Delete a customer record.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the customer does not exist
    pub async fn delete(&self, customer_id: Uuid) -> Result<(), AppError> {
        tracing::info!(customer_id = %customer_id, "starting customer deletion");

        self.get_by_id(customer_id).await?;
        self.customers.delete(customer_id).await?;

        tracing::info!(customer_id = %customer_id, "customer deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, customer_id: Uuid) -> Result<Customer, AppError> {
        self.customers.get_by_id(customer_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Customer with ID {customer_id} does not exist"))
        })
    }

    pub async fn get_all(&self) -> Result<Vec<Customer>, AppError> {
        self.customers.get_all().await
    }
}
