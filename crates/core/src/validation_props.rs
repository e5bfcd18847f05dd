//! Property-based tests for the operation validator.

use proptest::prelude::*;
use rust_decimal::Decimal;

use corebank_shared::types::{Currency, CustomerId};

use crate::account::{Account, AccountStatus, AccountType};
use crate::error::LedgerError;
use crate::transaction::OperationRequest;
use crate::validation::{validate_operation, validate_transition};

/// Strategy to generate a positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-positive amount.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Strategy to generate any account status.
fn any_status() -> impl Strategy<Value = AccountStatus> {
    prop_oneof![
        Just(AccountStatus::Active),
        Just(AccountStatus::Frozen),
        Just(AccountStatus::Blocked),
        Just(AccountStatus::Closed),
    ]
}

/// Strategy to generate a non-active account status.
fn inactive_status() -> impl Strategy<Value = AccountStatus> {
    prop_oneof![
        Just(AccountStatus::Frozen),
        Just(AccountStatus::Blocked),
        Just(AccountStatus::Closed),
    ]
}

fn account_with(balance: Decimal, status: AccountStatus) -> Account {
    let mut account = Account::open(CustomerId::new(), AccountType::Savings, Currency::Eur);
    account.balance = balance;
    account.status = status;
    account
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Non-positive amounts are rejected before any account is consulted.
    #[test]
    fn prop_non_positive_amount_rejected(
        amount in non_positive_amount(),
        balance in positive_amount(),
        status in any_status(),
    ) {
        let account = account_with(balance, status);
        let op = OperationRequest::Withdrawal { account_id: account.id, amount };
        prop_assert_eq!(
            validate_operation(&op, Some(&account), None),
            Err(LedgerError::InvalidAmount)
        );
    }

    /// A withdrawal never validates beyond the available balance.
    #[test]
    fn prop_withdrawal_never_exceeds_balance(
        balance in positive_amount(),
        amount in positive_amount(),
    ) {
        let account = account_with(balance, AccountStatus::Active);
        let op = OperationRequest::Withdrawal { account_id: account.id, amount };
        let result = validate_operation(&op, Some(&account), None);
        if amount > balance {
            prop_assert!(
                matches!(result, Err(LedgerError::InsufficientFunds { .. })),
                "expected InsufficientFunds, got {:?}",
                result
            );
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Deposits validate on any active account regardless of amount size.
    #[test]
    fn prop_deposit_accepted_on_active_accounts(
        balance in positive_amount(),
        amount in positive_amount(),
    ) {
        let account = account_with(balance, AccountStatus::Active);
        let op = OperationRequest::Deposit { account_id: account.id, amount };
        prop_assert!(validate_operation(&op, Some(&account), None).is_ok());
    }

    /// Every balance mutation is rejected on a non-active source account.
    #[test]
    fn prop_inactive_source_rejects_all_operations(
        balance in positive_amount(),
        amount in positive_amount(),
        status in inactive_status(),
    ) {
        let source = account_with(balance, status);
        let target = account_with(Decimal::ZERO, AccountStatus::Active);
        let ops = [
            OperationRequest::Deposit { account_id: source.id, amount },
            OperationRequest::Withdrawal { account_id: source.id, amount },
            OperationRequest::Payment { account_id: source.id, amount },
            OperationRequest::Transfer {
                source_account_id: source.id,
                target_account_id: target.id,
                amount,
            },
        ];
        for op in ops {
            let result = validate_operation(&op, Some(&source), Some(&target));
            prop_assert!(
                matches!(result, Err(LedgerError::AccountNotActive { .. })),
                "expected AccountNotActive, got {:?}",
                result
            );
        }
    }

    /// The closed status is terminal under every requested transition.
    #[test]
    fn prop_closed_is_terminal(to in any_status()) {
        let account = account_with(Decimal::ZERO, AccountStatus::Closed);
        prop_assert_eq!(
            validate_transition(&account, to),
            Err(LedgerError::AccountClosed(account.id))
        );
    }

    /// Closing any funded account reports the balance, whatever the status.
    #[test]
    fn prop_close_requires_zero_balance(
        balance in positive_amount(),
        status in prop_oneof![
            Just(AccountStatus::Active),
            Just(AccountStatus::Frozen),
            Just(AccountStatus::Blocked),
        ],
    ) {
        let account = account_with(balance, status);
        prop_assert_eq!(
            validate_transition(&account, AccountStatus::Closed),
            Err(LedgerError::NonZeroBalance { account_id: account.id, balance })
        );
    }
}
