//! HTTP request handlers and router assembly.
//!
//! Handlers stay thin: deserialize the request, call the owning service,
//! serialize the result. All business rules live in `crate::services`.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::db::DbPool;
use crate::services::account_service::AccountService;
use crate::services::customer_service::CustomerService;
use crate::services::ledger::LedgerEngine;

/// Account endpoints
pub mod accounts;
/// Customer registry endpoints
pub mod customers;
/// Service health check
pub mod health;
/// Ledger transaction endpoints
pub mod transactions;

/// Shared handler state: the services plus the pool for the health check.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub accounts: Arc<AccountService>,
    pub ledger: Arc<LedgerEngine>,
    pub customers: Arc<CustomerService>,
}

/// Build the full API router.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Account management
        .route("/api/v1/accounts", post(accounts::create_account))
        .route("/api/v1/accounts", get(accounts::list_accounts))
        .route("/api/v1/accounts/{id}", get(accounts::get_account))
        .route("/api/v1/accounts/{id}", put(accounts::update_account))
        .route("/api/v1/accounts/{id}", delete(accounts::delete_account))
        .route(
            "/api/v1/accounts/{id}/transactions",
            get(transactions::list_account_transactions),
        )
        // Ledger transactions
        .route("/api/v1/transactions", post(transactions::create_transaction))
        .route("/api/v1/transactions", get(transactions::list_transactions))
        .route(
            "/api/v1/transactions/{id}",
            get(transactions::get_transaction),
        )
        .route(
            "/api/v1/transactions/{id}",
            put(transactions::update_transaction),
        )
        .route(
            "/api/v1/transactions/{id}",
            delete(transactions::delete_transaction),
        )
        // Customer registry
        .route(
            "/api/v1/customers/{id}/accounts",
            get(accounts::list_customer_accounts),
        )
        .route("/api/v1/customers", post(customers::create_customer))
        .route("/api/v1/customers", get(customers::list_customers))
        .route("/api/v1/customers/{id}", get(customers::get_customer))
        .route("/api/v1/customers/{id}", put(customers::update_customer))
        .route("/api/v1/customers/{id}", delete(customers::delete_customer))
        .with_state(state)
}
