//! The append-only transaction log.
//!
//! Records are immutable once appended; reads take a snapshot and need no
//! coordination with writers beyond the log's own lock.

use std::sync::{PoisonError, RwLock};

use corebank_core::Transaction;
use corebank_shared::types::{AccountId, PageRequest, PageResponse};

/// Append-only record of every attempted balance-mutating operation.
#[derive(Debug, Default)]
pub struct TransactionLog {
    records: RwLock<Vec<Transaction>>,
}

impl TransactionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns it.
    pub fn append(&self, record: Transaction) -> Transaction {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        records.push(record.clone());
        record
    }

    /// Lists an account's records, newest first.
    ///
    /// Transfers show up for both sides: as source via `account_id` and as
    /// recipient via `target_account_id`. Pages may shift when new records
    /// land between requests; acceptable for an append-only log.
    #[must_use]
    pub fn list_by_account(
        &self,
        account_id: AccountId,
        page: PageRequest,
    ) -> PageResponse<Transaction> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let matching: Vec<&Transaction> = records
            .iter()
            .rev()
            .filter(|t| t.account_id == account_id || t.target_account_id == Some(account_id))
            .collect();

        let total = matching.len() as u64;
        let data: Vec<Transaction> = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();

        PageResponse::new(data, page.page, page.per_page, total)
    }

    /// Total number of records in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
