//! Domain records and API request/response types.

/// Bank account model and account type lookup
pub mod account;
/// Customer registry model
pub mod customer;
/// Ledger transaction model and the signed-amount rule
pub mod transaction;
