//! Banking ledger service - application entry point.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create the PostgreSQL pool and run migrations
//! 3. Wire the stores, services and the provisioning queue
//! 4. Spawn the provisioning consumer
//! 5. Build the HTTP router and start serving

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ledger_service::config::Config;
use ledger_service::handlers::{self, AppState};
use ledger_service::messaging::InProcessQueue;
use ledger_service::services::account_service::AccountService;
use ledger_service::services::customer_service::CustomerService;
use ledger_service::services::ledger::LedgerEngine;
use ledger_service::services::provisioning::ProvisioningConsumer;
use ledger_service::store::postgres::{PgAccountStore, PgCustomerStore, PgTransactionStore};
use ledger_service::{db, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let account_store: Arc<dyn store::AccountStore> = Arc::new(PgAccountStore::new(pool.clone()));
    let transaction_store: Arc<dyn store::TransactionStore> =
        Arc::new(PgTransactionStore::new(pool.clone()));
    let customer_store: Arc<dyn store::CustomerStore> =
        Arc::new(PgCustomerStore::new(pool.clone()));

    let (queue, receiver) = InProcessQueue::new(config.provisioning_queue_depth);

    let accounts = Arc::new(AccountService::new(
        account_store.clone(),
        transaction_store.clone(),
    ));
    let ledger = Arc::new(LedgerEngine::new(transaction_store, account_store));
    let customers = Arc::new(CustomerService::new(customer_store, Arc::new(queue)));

    // Customer registration hands off to this consumer asynchronously
    let consumer = ProvisioningConsumer::new(accounts.clone(), config.provisioning_max_retries);
    tokio::spawn(consumer.run(receiver));
    tracing::info!("Provisioning consumer started");

    let app = handlers::api_router(AppState {
        pool,
        accounts,
        ledger,
        customers,
    })
    .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
