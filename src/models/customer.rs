//! Customer registry model and API request/response types.
//!
//! Customers live outside the ledger core; their contract with it is the
//! provisioning hand-off (customer id + phone number) fired on creation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn id(self) -> i16 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Other => 3,
        }
    }

    pub fn from_id(id: i16) -> Result<Self, AppError> {
        match id {
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            3 => Ok(Gender::Other),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown gender id: {other}"
            ))),
        }
    }
}

/// Personal data attached to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub gender: Gender,
    pub age: i32,

    /// National identification, unique across customers
    pub identification: String,

    pub address: String,

    /// Phone number; doubles as the account number of the
    /// automatically provisioned default account
    pub phone: String,
}

/// A registered customer.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: Uuid,

    /// Business-facing customer reference
    pub customer_ref: String,

    #[serde(skip_serializing)]
    pub password: String,

    pub status: bool,
    pub person: Person,
}

/// Request body for registering a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub customer_ref: String,
    pub password: String,
    pub status: bool,
    pub person: Person,
}

/// Request body for updating a customer.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub id: Uuid,
    pub customer_ref: String,
    pub password: String,
    pub status: bool,
    pub person: Person,
}

/// Response body for customer endpoints; the password is never echoed.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub customer_ref: String,
    pub status: bool,
    pub person: Person,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            customer_ref: customer.customer_ref,
            status: customer.status,
            person: customer.person,
        }
    }
}
