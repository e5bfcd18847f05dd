//! Customer status and the external directory seam.
//!
//! Customers are owned by the identity service; the ledger only queries
//! their status as a precondition when opening accounts.

use serde::{Deserialize, Serialize};

use corebank_shared::types::CustomerId;

/// Customer lifecycle status as reported by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerStatus {
    /// Customer is active and may open accounts.
    Active,
    /// Customer has not completed KYC.
    PendingKyc,
    /// Customer is suspended.
    Suspended,
    /// Customer relationship is closed.
    Closed,
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::PendingKyc => write!(f, "PENDING_KYC"),
            Self::Suspended => write!(f, "SUSPENDED"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Read-only view of the external customer registry.
///
/// The ledger service consults this before opening an account; it never
/// mutates customer state.
pub trait CustomerDirectory {
    /// Returns the customer's status, or `None` if the customer is unknown.
    fn status(&self, customer_id: CustomerId) -> Option<CustomerStatus>;
}
