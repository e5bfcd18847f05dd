//! Ledger error taxonomy.
//!
//! Every rejection carries a specific, stable code; callers never see a
//! generic "operation failed". Only `Conflict` is retryable, and it is
//! retried internally by the ledger service before being surfaced.

use rust_decimal::Decimal;
use thiserror::Error;

use corebank_shared::types::{AccountId, CustomerId};

use crate::account::AccountStatus;
use crate::customer::CustomerStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Operation Validation ==========
    /// Amount must be a positive value.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Source account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Source account status blocks balance-mutating operations.
    #[error("Account {account_id} is not active (status: {status})")]
    AccountNotActive {
        /// The account.
        account_id: AccountId,
        /// Its current status.
        status: AccountStatus,
    },

    /// Balance is insufficient for the requested debit.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the caller asked to debit.
        requested: Decimal,
        /// Balance at validation time.
        available: Decimal,
    },

    /// Transfer target account does not exist.
    #[error("Target account not found: {0}")]
    TargetAccountNotFound(AccountId),

    /// Transfer source and target are the same account.
    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,

    /// Transfer target account status blocks incoming credits.
    #[error("Target account {account_id} is not active (status: {status})")]
    TargetAccountNotActive {
        /// The target account.
        account_id: AccountId,
        /// Its current status.
        status: AccountStatus,
    },

    // ========== Status Transitions ==========
    /// No transition may leave the `Closed` status.
    #[error("Account {0} is closed")]
    AccountClosed(AccountId),

    /// Closing requires a zero balance.
    #[error("Cannot close account {account_id} with non-zero balance {balance}")]
    NonZeroBalance {
        /// The account.
        account_id: AccountId,
        /// Its current balance.
        balance: Decimal,
    },

    /// The requested transition is not an edge of the status state machine.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: AccountStatus,
        /// Requested status.
        to: AccountStatus,
    },

    // ========== Account Opening ==========
    /// Referenced customer is unknown to the identity service.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Customer status forbids opening accounts.
    #[error("Customer {customer_id} is not active (status: {status})")]
    CustomerNotActive {
        /// The customer.
        customer_id: CustomerId,
        /// Status reported by the identity service.
        status: CustomerStatus,
    },

    /// A customer may hold at most one current account.
    #[error("Customer {0} already has a current account")]
    DuplicateCurrentAccount(CustomerId),

    // ========== Concurrency ==========
    /// Conditional commits kept conflicting until the retry budget ran out.
    #[error("Concurrent modification of account {0}, retries exhausted")]
    Conflict(AccountId),
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountNotActive { .. } => "ACCOUNT_NOT_ACTIVE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::TargetAccountNotFound(_) => "TARGET_ACCOUNT_NOT_FOUND",
            Self::SameAccountTransfer => "SAME_ACCOUNT_TRANSFER",
            Self::TargetAccountNotActive { .. } => "TARGET_ACCOUNT_NOT_ACTIVE",
            Self::AccountClosed(_) => "ACCOUNT_CLOSED",
            Self::NonZeroBalance { .. } => "NON_ZERO_BALANCE",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::CustomerNotActive { .. } => "CUSTOMER_NOT_ACTIVE",
            Self::DuplicateCurrentAccount(_) => "DUPLICATE_CURRENT_ACCOUNT",
            Self::Conflict(_) => "CONFLICT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed requests
            Self::InvalidAmount | Self::SameAccountTransfer => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::TargetAccountNotFound(_)
            | Self::CustomerNotFound(_) => 404,

            // 409 Conflict - concurrency errors
            Self::Conflict(_) => 409,

            // 422 Unprocessable Entity - business rule violations
            Self::AccountNotActive { .. }
            | Self::InsufficientFunds { .. }
            | Self::TargetAccountNotActive { .. }
            | Self::AccountClosed(_)
            | Self::NonZeroBalance { .. }
            | Self::InvalidStatusTransition { .. }
            | Self::CustomerNotActive { .. }
            | Self::DuplicateCurrentAccount(_) => 422,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
