//! Business logic services.
//!
//! Services own the business rules, separated from the HTTP handlers. They
//! talk to storage through the port traits only.

pub mod account_service;
pub mod customer_service;
pub mod ledger;
pub mod provisioning;
