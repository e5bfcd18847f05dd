//! Account records and the status state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corebank_shared::types::{AccountId, Currency, CustomerId};

/// Account types offered to customers, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Everyday current account. A customer may hold at most one.
    Current,
    /// Savings account.
    Savings,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Current => write!(f, "CURRENT"),
            Self::Savings => write!(f, "SAVINGS"),
        }
    }
}

/// Account lifecycle status.
///
/// Transitions:
/// - `Active -> Frozen` (freeze)
/// - `Active -> Blocked` (block)
/// - `Frozen -> Active`, `Blocked -> Active` (activate)
/// - `Active | Frozen | Blocked -> Closed` (close, balance must be zero)
///
/// `Closed` is terminal. Frozen and Blocked differ only in why they were
/// set; both reject every balance-mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// Account accepts all operations.
    Active,
    /// Temporarily suspended by the bank (e.g. suspicious activity review).
    Frozen,
    /// Blocked by an administrative decision (e.g. customer suspension).
    Blocked,
    /// Permanently closed. Terminal.
    Closed,
}

impl AccountStatus {
    /// Returns true if no transition may leave this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true if the state machine permits `self -> to`.
    ///
    /// The zero-balance precondition on closing is checked by the validator,
    /// not here; this only answers whether the edge exists.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Frozen | Self::Blocked)
                | (Self::Frozen | Self::Blocked, Self::Active)
                | (Self::Active | Self::Frozen | Self::Blocked, Self::Closed)
        )
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Frozen => write!(f, "FROZEN"),
            Self::Blocked => write!(f, "BLOCKED"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A ledger account record.
///
/// The balance is a `Decimal` and is never negative at any observable point.
/// A `Closed` account has a zero balance permanently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, immutable once created.
    pub id: AccountId,
    /// Owning customer (lifecycle owned by the identity service).
    pub customer_id: CustomerId,
    /// Account type, fixed at creation.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Denomination currency, fixed at creation.
    pub currency: Currency,
    /// Current balance. Invariant: `balance >= 0`.
    pub balance: Decimal,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Opens a new account: `Active`, zero balance.
    #[must_use]
    pub fn open(customer_id: CustomerId, account_type: AccountType, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            customer_id,
            account_type,
            currency,
            balance: Decimal::ZERO,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the account accepts balance-mutating operations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}
