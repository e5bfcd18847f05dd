//! Versioned account storage with conditional commits.
//!
//! Every account record carries a version that moves on each commit. Writers
//! read a snapshot, validate against it, and commit conditionally on the
//! version being unchanged; a moved version yields `StoreError::Conflict`
//! and the caller re-runs its validate-then-commit cycle.
//!
//! Two-account commits (transfers) take both per-account locks in ascending
//! id order, so concurrent transfers in opposite directions cannot deadlock.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use dashmap::DashMap;
use thiserror::Error;

use corebank_core::{Account, AccountType};
use corebank_shared::types::{AccountId, CustomerId};

/// Errors surfaced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record for the given account id.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// The record's version moved since the caller's snapshot.
    #[error("Version conflict on account {account_id}: expected {expected}, found {actual}")]
    Conflict {
        /// The contested account.
        account_id: AccountId,
        /// Version the caller read.
        expected: u64,
        /// Version currently committed.
        actual: u64,
    },

    /// An account with this id is already registered.
    #[error("Account already registered: {0}")]
    Duplicate(AccountId),

    /// A pair commit was asked to update one account twice.
    #[error("Pair commit requires two distinct accounts")]
    DistinctAccountsRequired,
}

/// An account snapshot paired with the version it was read at.
#[derive(Debug, Clone)]
pub struct VersionedAccount {
    /// The record as of the read.
    pub account: Account,
    /// Version to pass back for a conditional commit.
    pub version: u64,
}

#[derive(Debug)]
struct Slot {
    account: Account,
    version: u64,
}

type SlotHandle = Arc<RwLock<Slot>>;

/// Keyed storage of versioned account records.
///
/// The registry maps ids to independently lockable slots; registry access is
/// brief, and commits only hold the slots they touch.
#[derive(Debug, Default)]
pub struct LedgerStore {
    accounts: DashMap<AccountId, SlotHandle>,
}

impl LedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account at version 1.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the id is already registered.
    pub fn insert(&self, account: Account) -> Result<(), StoreError> {
        let id = account.id;
        match self.accounts.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Duplicate(id)),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(Arc::new(RwLock::new(Slot {
                    account,
                    version: 1,
                })));
                Ok(())
            }
        }
    }

    /// Reads a snapshot of an account together with its current version.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<VersionedAccount> {
        let handle = self.handle(id)?;
        let slot = read(&handle);
        Some(VersionedAccount {
            account: slot.account.clone(),
            version: slot.version,
        })
    }

    /// Lists all accounts, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| read(entry.value()).account.clone())
            .collect();
        accounts.sort_by_key(|a| (a.created_at, a.id));
        accounts
    }

    /// Lists a customer's accounts, oldest first.
    #[must_use]
    pub fn list_by_customer(&self, customer_id: CustomerId) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter_map(|entry| {
                let slot = read(entry.value());
                (slot.account.customer_id == customer_id).then(|| slot.account.clone())
            })
            .collect();
        accounts.sort_by_key(|a| (a.created_at, a.id));
        accounts
    }

    /// Returns true if the customer already holds a current account.
    #[must_use]
    pub fn has_current_account(&self, customer_id: CustomerId) -> bool {
        self.accounts.iter().any(|entry| {
            let slot = read(entry.value());
            slot.account.customer_id == customer_id
                && slot.account.account_type == AccountType::Current
        })
    }

    /// Conditionally commits a mutation to a single account.
    ///
    /// The mutation is applied only if the record's version still equals
    /// `expected_version`; on success the version moves and `updated_at` is
    /// refreshed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Conflict`.
    pub fn update<F>(
        &self,
        id: AccountId,
        expected_version: u64,
        mutate: F,
    ) -> Result<Account, StoreError>
    where
        F: FnOnce(&mut Account),
    {
        let handle = self.handle(id).ok_or(StoreError::NotFound(id))?;
        let mut slot = write(&handle);
        if slot.version != expected_version {
            return Err(StoreError::Conflict {
                account_id: id,
                expected: expected_version,
                actual: slot.version,
            });
        }
        mutate(&mut slot.account);
        slot.account.updated_at = Utc::now();
        slot.version += 1;
        Ok(slot.account.clone())
    }

    /// Conditionally commits mutations to two distinct accounts as a unit.
    ///
    /// Both version checks happen under both locks; either both mutations
    /// commit or neither does. Locks are taken in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns `DistinctAccountsRequired`, `NotFound`, or `Conflict` (for
    /// whichever account's version moved first).
    pub fn update_pair<F, G>(
        &self,
        source: (AccountId, u64),
        target: (AccountId, u64),
        mutate_source: F,
        mutate_target: G,
    ) -> Result<(Account, Account), StoreError>
    where
        F: FnOnce(&mut Account),
        G: FnOnce(&mut Account),
    {
        let (source_id, source_version) = source;
        let (target_id, target_version) = target;
        if source_id == target_id {
            return Err(StoreError::DistinctAccountsRequired);
        }

        let source_handle = self
            .handle(source_id)
            .ok_or(StoreError::NotFound(source_id))?;
        let target_handle = self
            .handle(target_id)
            .ok_or(StoreError::NotFound(target_id))?;

        // Ascending id order prevents deadlock between opposing transfers.
        let (first, second) = if source_id < target_id {
            (&source_handle, &target_handle)
        } else {
            (&target_handle, &source_handle)
        };
        let first_slot = write(first);
        let second_slot = write(second);
        let (mut source_slot, mut target_slot) = if source_id < target_id {
            (first_slot, second_slot)
        } else {
            (second_slot, first_slot)
        };

        if source_slot.version != source_version {
            return Err(StoreError::Conflict {
                account_id: source_id,
                expected: source_version,
                actual: source_slot.version,
            });
        }
        if target_slot.version != target_version {
            return Err(StoreError::Conflict {
                account_id: target_id,
                expected: target_version,
                actual: target_slot.version,
            });
        }

        let now = Utc::now();
        mutate_source(&mut source_slot.account);
        source_slot.account.updated_at = now;
        source_slot.version += 1;
        mutate_target(&mut target_slot.account);
        target_slot.account.updated_at = now;
        target_slot.version += 1;

        Ok((source_slot.account.clone(), target_slot.account.clone()))
    }

    fn handle(&self, id: AccountId) -> Option<SlotHandle> {
        self.accounts.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}

fn read(handle: &SlotHandle) -> std::sync::RwLockReadGuard<'_, Slot> {
    handle.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(handle: &SlotHandle) -> std::sync::RwLockWriteGuard<'_, Slot> {
    handle.write().unwrap_or_else(PoisonError::into_inner)
}
