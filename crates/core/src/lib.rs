//! Core ledger business logic for Corebank.
//!
//! This crate contains pure business logic with ZERO web or storage
//! dependencies. All domain types, validation rules, and the account status
//! state machine live here.
//!
//! # Modules
//!
//! - `account` - Account records and the status state machine
//! - `customer` - Customer status and the external directory seam
//! - `transaction` - Transaction log records and operation requests
//! - `validation` - The pure operation validator
//! - `error` - The ledger error taxonomy

pub mod account;
pub mod customer;
pub mod error;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountStatus, AccountType};
pub use customer::{CustomerDirectory, CustomerStatus};
pub use error::LedgerError;
pub use transaction::{OperationRequest, Transaction, TransactionStatus, TransactionType};
