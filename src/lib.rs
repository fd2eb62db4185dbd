//! Banking ledger service library.
//!
//! Two logical services share this crate: a customer registry and an
//! account/transaction ledger, linked by an asynchronous provisioning
//! hand-off (registering a customer opens a default account).
//!
//! The balance-integrity core lives in [`services::ledger`]: running
//! balances are denormalized onto transaction records, funds may never go
//! negative, and only an account's most recent transaction can be amended
//! or deleted. Storage is abstracted behind the port traits in [`store`],
//! with PostgreSQL and in-memory adapters.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod models;
pub mod services;
pub mod store;
