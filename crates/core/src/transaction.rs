//! Transaction log records and operation requests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corebank_shared::types::{AccountId, TransactionId};

use crate::error::LedgerError;

/// The kind of balance-mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Credit to the account.
    Deposit,
    /// Cash debit from the account.
    Withdrawal,
    /// Debit from the source account, credit to the target account.
    Transfer,
    /// Debit from the account towards an external payee.
    Payment,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdrawal => write!(f, "WITHDRAWAL"),
            Self::Transfer => write!(f, "TRANSFER"),
            Self::Payment => write!(f, "PAYMENT"),
        }
    }
}

/// Terminal outcome of a transaction. Assigned at completion; transactions
/// are never persisted in a pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// The operation committed.
    Success,
    /// The operation was rejected; `failure_reason` carries the code.
    Failed,
}

/// An immutable transaction log record.
///
/// Every deposit/withdrawal/transfer/payment attempt produces exactly one
/// record, success or failure. Records are append-only; no in-place edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned on append.
    pub id: TransactionId,
    /// Source account for debits, destination account for deposits.
    pub account_id: AccountId,
    /// Receiving account; present only for transfers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_account_id: Option<AccountId>,
    /// Operation kind.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Requested amount as submitted by the caller.
    pub amount: Decimal,
    /// Terminal outcome.
    pub status: TransactionStatus,
    /// Specific error code when `status == Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Timestamp of the attempt, assigned on append.
    pub created_at: DateTime<Utc>,
}

/// A requested balance-mutating operation.
///
/// This is the canonical tagged request shape: each variant carries only the
/// fields its operation needs, so a transfer without a target account is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum OperationRequest {
    /// Credit `amount` to the account.
    Deposit {
        /// Destination account.
        account_id: AccountId,
        /// Amount to credit.
        amount: Decimal,
    },
    /// Debit `amount` from the account.
    Withdrawal {
        /// Source account.
        account_id: AccountId,
        /// Amount to debit.
        amount: Decimal,
    },
    /// Debit `amount` from the account towards an external payee.
    Payment {
        /// Source account.
        account_id: AccountId,
        /// Amount to debit.
        amount: Decimal,
    },
    /// Move `amount` from the source account to the target account.
    Transfer {
        /// Source account.
        source_account_id: AccountId,
        /// Receiving account.
        target_account_id: AccountId,
        /// Amount to move.
        amount: Decimal,
    },
}

impl OperationRequest {
    /// The requested amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Deposit { amount, .. }
            | Self::Withdrawal { amount, .. }
            | Self::Payment { amount, .. }
            | Self::Transfer { amount, .. } => *amount,
        }
    }

    /// The primary account: the source for debits, the destination for
    /// deposits.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        match self {
            Self::Deposit { account_id, .. }
            | Self::Withdrawal { account_id, .. }
            | Self::Payment { account_id, .. } => *account_id,
            Self::Transfer {
                source_account_id, ..
            } => *source_account_id,
        }
    }

    /// The receiving account for transfers.
    #[must_use]
    pub const fn target_account_id(&self) -> Option<AccountId> {
        match self {
            Self::Transfer {
                target_account_id, ..
            } => Some(*target_account_id),
            _ => None,
        }
    }

    /// The corresponding log record type.
    #[must_use]
    pub const fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Deposit { .. } => TransactionType::Deposit,
            Self::Withdrawal { .. } => TransactionType::Withdrawal,
            Self::Payment { .. } => TransactionType::Payment,
            Self::Transfer { .. } => TransactionType::Transfer,
        }
    }

    /// Returns true if the operation debits its primary account.
    #[must_use]
    pub const fn debits_source(&self) -> bool {
        !matches!(self, Self::Deposit { .. })
    }
}

impl Transaction {
    /// Builds a `Success` record for a committed operation, assigning the id
    /// and timestamp.
    #[must_use]
    pub fn success(op: &OperationRequest) -> Self {
        Self::build(op, TransactionStatus::Success, None)
    }

    /// Builds a terminal `Failed` record carrying the rejection's error code.
    #[must_use]
    pub fn failed(op: &OperationRequest, reason: &LedgerError) -> Self {
        Self::build(
            op,
            TransactionStatus::Failed,
            Some(reason.error_code().to_string()),
        )
    }

    fn build(
        op: &OperationRequest,
        status: TransactionStatus,
        failure_reason: Option<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            account_id: op.account_id(),
            target_account_id: op.target_account_id(),
            transaction_type: op.transaction_type(),
            amount: op.amount(),
            status,
            failure_reason,
            created_at: Utc::now(),
        }
    }
}
