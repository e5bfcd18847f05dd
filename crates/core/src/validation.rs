//! The pure operation validator.
//!
//! Given snapshots of the involved account state and a requested operation,
//! these functions decide accept/reject and produce a specific error on
//! rejection. They never mutate anything; the ledger service re-runs them
//! against a fresh snapshot on every commit attempt.
//!
//! Rules are evaluated in a fixed order and the first failing rule wins, so
//! a request with several problems always reports the same code.

use rust_decimal::Decimal;

use corebank_shared::types::CustomerId;

use crate::account::{Account, AccountStatus, AccountType};
use crate::customer::CustomerStatus;
use crate::error::LedgerError;
use crate::transaction::OperationRequest;

/// Validates a balance-mutating operation against account snapshots.
///
/// `source` is the snapshot for the operation's primary account, `target`
/// for the transfer target (ignored for other operations). `None` means the
/// account was not found in the store.
///
/// # Errors
///
/// Returns the first failing rule's `LedgerError`.
pub fn validate_operation(
    op: &OperationRequest,
    source: Option<&Account>,
    target: Option<&Account>,
) -> Result<(), LedgerError> {
    // 1. Amount must be positive.
    if op.amount() <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }

    // 2. Source account must exist.
    let source = source.ok_or(LedgerError::AccountNotFound(op.account_id()))?;

    // 3. Status gates every balance mutation, deposits included.
    if !source.is_active() {
        return Err(LedgerError::AccountNotActive {
            account_id: source.id,
            status: source.status,
        });
    }

    // 4. Debits must be covered by the balance.
    if op.debits_source() && op.amount() > source.balance {
        return Err(LedgerError::InsufficientFunds {
            requested: op.amount(),
            available: source.balance,
        });
    }

    // 5./6. Transfer target checks.
    if let Some(target_id) = op.target_account_id() {
        let target = target.ok_or(LedgerError::TargetAccountNotFound(target_id))?;
        if target.id == source.id {
            return Err(LedgerError::SameAccountTransfer);
        }
        if !target.is_active() {
            return Err(LedgerError::TargetAccountNotActive {
                account_id: target.id,
                status: target.status,
            });
        }
    }

    Ok(())
}

/// Validates a status transition request against the state machine.
///
/// # Errors
///
/// Returns `AccountClosed` for any transition out of `Closed`,
/// `NonZeroBalance` for closing a funded account, and
/// `InvalidStatusTransition` for every other missing edge.
pub fn validate_transition(account: &Account, to: AccountStatus) -> Result<(), LedgerError> {
    if account.status.is_terminal() {
        return Err(LedgerError::AccountClosed(account.id));
    }
    if !account.status.can_transition_to(to) {
        return Err(LedgerError::InvalidStatusTransition {
            from: account.status,
            to,
        });
    }
    if to == AccountStatus::Closed && !account.balance.is_zero() {
        return Err(LedgerError::NonZeroBalance {
            account_id: account.id,
            balance: account.balance,
        });
    }
    Ok(())
}

/// Validates the preconditions for opening an account.
///
/// `customer_status` is the identity service's answer (`None` = unknown
/// customer); `has_current_account` reports whether the customer already
/// holds a current account.
///
/// # Errors
///
/// Returns `CustomerNotFound`, `CustomerNotActive`, or
/// `DuplicateCurrentAccount`.
pub fn validate_open_account(
    customer_id: CustomerId,
    customer_status: Option<CustomerStatus>,
    account_type: AccountType,
    has_current_account: bool,
) -> Result<(), LedgerError> {
    let status = customer_status.ok_or(LedgerError::CustomerNotFound(customer_id))?;
    if status != CustomerStatus::Active {
        return Err(LedgerError::CustomerNotActive {
            customer_id,
            status,
        });
    }
    if account_type == AccountType::Current && has_current_account {
        return Err(LedgerError::DuplicateCurrentAccount(customer_id));
    }
    Ok(())
}
