//! Ledger transaction HTTP handlers.
//!
//! - POST /api/v1/transactions - record a transaction
//! - GET /api/v1/transactions - list all transactions
//! - GET /api/v1/transactions/{id} - get transaction by ID
//! - PUT /api/v1/transactions/{id} - amend the account's last transaction
//! - DELETE /api/v1/transactions/{id} - delete the account's last transaction
//! - GET /api/v1/accounts/{id}/transactions - one account's ledger

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::transaction::{
    CreateTransactionRequest, TransactionResponse, UpdateTransactionRequest,
};

/// Record a new transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "transaction_type": "withdrawal",
///   "amount": "200.00"
/// }
/// ```
///
/// The amount is a positive magnitude; the server derives the sign from
/// the type and stores withdrawals as negative amounts.
///
/// # Response
///
/// - **201 Created**: the transaction with its computed running balance
/// - **404 Not Found**: account does not exist
/// - **422 Unprocessable Entity**: insufficient funds
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let transaction = state.ledger.create(request).await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

/// Get a transaction by ID.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state.ledger.get_by_id(transaction_id).await?;
    Ok(Json(transaction.into()))
}

/// List all transactions across accounts.
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let transactions = state.ledger.get_all().await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// List one account's ledger, oldest first.
pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    let transactions = state.ledger.get_by_account(account_id).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

/// Amend a transaction's amount/type.
///
/// Only the most recent transaction of its account is eligible; anything
/// older is rejected with 400 and the ledger is left unchanged.
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    if request.id != transaction_id {
        return Err(AppError::InvalidRequest(
            "Path id does not match body id".to_string(),
        ));
    }
    let transaction = state.ledger.update(request).await?;
    Ok(Json(transaction.into()))
}

/// Delete a transaction; only the account's most recent one may go.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.ledger.delete(transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
