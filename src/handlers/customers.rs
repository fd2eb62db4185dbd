//! Customer registry HTTP handlers.
//!
//! - POST /api/v1/customers - register a customer (triggers the async
//!   default-account provisioning hand-off)
//! - GET /api/v1/customers - list customers
//! - GET /api/v1/customers/{id} - get customer by ID
//! - PUT /api/v1/customers/{id} - update customer
//! - DELETE /api/v1/customers/{id} - delete customer

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::customer::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};

/// Register a new customer.
///
/// # Response
///
/// - **201 Created**: the registered customer (password omitted)
/// - **409 Conflict**: identification already registered
///
/// The default account is provisioned asynchronously; it appears under
/// `/api/v1/accounts` once the hand-off has been consumed.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let customer = state.customers.create(request).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Get a customer by ID.
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = state.customers.get_by_id(customer_id).await?;
    Ok(Json(customer.into()))
}

/// List all customers.
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = state.customers.get_all().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Update a customer's person data and status.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    if request.id != customer_id {
        return Err(AppError::InvalidRequest(
            "Path id does not match body id".to_string(),
        ));
    }
    let customer = state.customers.update(request).await?;
    Ok(Json(customer.into()))
}

/// Delete a customer record.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.customers.delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
