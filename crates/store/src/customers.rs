//! In-memory view of the external customer directory.
//!
//! Customer lifecycle is owned by the identity service; this registry caches
//! the statuses the ledger needs for account-opening preconditions. In a
//! deployment it is fed from identity-service events.

use dashmap::DashMap;

use corebank_core::{CustomerDirectory, CustomerStatus};
use corebank_shared::types::CustomerId;

/// Customer status registry backing `CustomerDirectory`.
#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    statuses: DashMap<CustomerId, CustomerStatus>,
}

impl InMemoryCustomerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or replaces a customer's status.
    pub fn upsert(&self, customer_id: CustomerId, status: CustomerStatus) {
        self.statuses.insert(customer_id, status);
    }
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn status(&self, customer_id: CustomerId) -> Option<CustomerStatus> {
        self.statuses.get(&customer_id).map(|entry| *entry.value())
    }
}
