//! In-process ledger storage and the ledger service orchestrator.
//!
//! This crate owns the shared mutable state of the system:
//! - `store` - versioned account records with conditional commits
//! - `log` - the append-only transaction log
//! - `customers` - an in-memory view of the external customer directory
//! - `service` - the `LedgerService` orchestrator tying them together

pub mod customers;
pub mod log;
pub mod service;
pub mod store;

pub use customers::InMemoryCustomerDirectory;
pub use log::TransactionLog;
pub use service::LedgerService;
pub use store::{LedgerStore, StoreError, VersionedAccount};
