//! Account management HTTP handlers.
//!
//! - POST /api/v1/accounts - create account
//! - GET /api/v1/accounts - list accounts
//! - GET /api/v1/accounts/{id} - get account by ID
//! - PUT /api/v1/accounts/{id} - update account
//! - DELETE /api/v1/accounts/{id} - delete account with its transactions

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::account::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "account_number": "2254871234",
///   "account_type": "savings",
///   "initial_balance": "1000.00",
///   "customer_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the persisted account, always active
/// - **409 Conflict**: account number already in use
/// - **400 Bad Request**: invalid account number or negative balance
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let account = state.accounts.create(request).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get a specific account by ID. Returns 404 if it does not exist.
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.accounts.get_by_id(account_id).await?;
    Ok(Json(account.into()))
}

/// List all accounts.
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.accounts.get_all().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// List the accounts owned by one customer. Includes the automatically
/// provisioned default account once the hand-off has been consumed.
pub async fn list_customer_accounts(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.accounts.get_by_customer(customer_id).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Update an account.
///
/// Only account type, initial balance and status may change; a request
/// that alters the account number or customer id is rejected with 400.
pub async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    if request.id != account_id {
        return Err(AppError::InvalidRequest(
            "Path id does not match body id".to_string(),
        ));
    }
    let account = state.accounts.update(request.into_account()).await?;
    Ok(Json(account.into()))
}

/// Delete an account and all of its transactions.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.accounts.delete(account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
