//! The ledger service orchestrator.
//!
//! Every operation runs a validate-then-commit cycle against snapshots from
//! the store: validation is pure, the commit is conditional on the versions
//! the snapshots were read at, and a conflicting commit restarts the cycle
//! with fresh snapshots. Retries are bounded; exhaustion surfaces as
//! `Conflict` so callers never implement their own retry for the same
//! logical operation.
//!
//! Each balance-mutating call appends exactly one terminal log record,
//! success or failure. Status transitions mutate the account only and are
//! logged as tracing events.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use corebank_core::validation::{validate_open_account, validate_operation, validate_transition};
use corebank_core::{
    Account, AccountStatus, AccountType, CustomerDirectory, LedgerError, OperationRequest,
    Transaction,
};
use corebank_shared::config::LedgerConfig;
use corebank_shared::types::{AccountId, Currency, CustomerId, PageRequest, PageResponse};

use crate::log::TransactionLog;
use crate::store::{LedgerStore, StoreError};

/// Coordinates the validator, the account store, and the transaction log.
pub struct LedgerService {
    store: LedgerStore,
    log: TransactionLog,
    customers: Arc<dyn CustomerDirectory + Send + Sync>,
    max_commit_attempts: u32,
}

impl LedgerService {
    /// Creates a service over empty storage.
    #[must_use]
    pub fn new(
        customers: Arc<dyn CustomerDirectory + Send + Sync>,
        config: &LedgerConfig,
    ) -> Self {
        Self {
            store: LedgerStore::new(),
            log: TransactionLog::new(),
            customers,
            max_commit_attempts: config.max_commit_attempts.max(1),
        }
    }

    // ========================================================================
    // Account lifecycle
    // ========================================================================

    /// Opens an account for an active customer.
    ///
    /// A customer may hold at most one current account. New accounts start
    /// `Active` with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `CustomerNotActive`, or
    /// `DuplicateCurrentAccount`.
    pub fn open_account(
        &self,
        customer_id: CustomerId,
        account_type: AccountType,
        currency: Currency,
    ) -> Result<Account, LedgerError> {
        validate_open_account(
            customer_id,
            self.customers.status(customer_id),
            account_type,
            self.store.has_current_account(customer_id),
        )?;

        let account = Account::open(customer_id, account_type, currency);
        self.store
            .insert(account.clone())
            .map_err(|_| LedgerError::Conflict(account.id))?;
        info!(
            account_id = %account.id,
            customer_id = %customer_id,
            kind = %account_type,
            currency = %currency,
            "account opened"
        );
        Ok(account)
    }

    /// Freezes an active account.
    pub fn freeze(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.transition(id, AccountStatus::Frozen)
    }

    /// Blocks an active account.
    pub fn block(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.transition(id, AccountStatus::Blocked)
    }

    /// Reactivates a frozen or blocked account.
    pub fn activate(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.transition(id, AccountStatus::Active)
    }

    /// Closes an account. The balance must already be zero; `Closed` is
    /// terminal.
    pub fn close(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.transition(id, AccountStatus::Closed)
    }

    /// Blocks every currently active account of a customer. Used when the
    /// identity service suspends the customer.
    pub fn block_customer_accounts(&self, customer_id: CustomerId) -> Vec<Account> {
        let mut blocked = Vec::new();
        for account in self.store.list_by_customer(customer_id) {
            if account.status == AccountStatus::Active {
                if let Ok(updated) = self.block(account.id) {
                    blocked.push(updated);
                }
            }
        }
        info!(
            customer_id = %customer_id,
            count = blocked.len(),
            "blocked customer accounts"
        );
        blocked
    }

    // ========================================================================
    // Balance-mutating operations
    // ========================================================================

    /// Credits `amount` to the account.
    pub fn deposit(&self, account_id: AccountId, amount: Decimal) -> Transaction {
        self.execute(OperationRequest::Deposit { account_id, amount })
    }

    /// Debits `amount` from the account.
    pub fn withdraw(&self, account_id: AccountId, amount: Decimal) -> Transaction {
        self.execute(OperationRequest::Withdrawal { account_id, amount })
    }

    /// Debits `amount` from the account towards an external payee.
    pub fn pay(&self, account_id: AccountId, amount: Decimal) -> Transaction {
        self.execute(OperationRequest::Payment { account_id, amount })
    }

    /// Moves `amount` from the source account to the target account.
    pub fn transfer(
        &self,
        source_account_id: AccountId,
        target_account_id: AccountId,
        amount: Decimal,
    ) -> Transaction {
        self.execute(OperationRequest::Transfer {
            source_account_id,
            target_account_id,
            amount,
        })
    }

    /// Runs an operation to its terminal outcome and appends exactly one log
    /// record, success or failure.
    pub fn execute(&self, op: OperationRequest) -> Transaction {
        match self.commit(op) {
            Ok(()) => {
                let record = self.log.append(Transaction::success(&op));
                info!(
                    transaction_id = %record.id,
                    account_id = %op.account_id(),
                    kind = %op.transaction_type(),
                    amount = %op.amount(),
                    "transaction committed"
                );
                record
            }
            Err(reason) => {
                let record = self.log.append(Transaction::failed(&op, &reason));
                warn!(
                    transaction_id = %record.id,
                    account_id = %op.account_id(),
                    kind = %op.transaction_type(),
                    code = reason.error_code(),
                    "transaction rejected"
                );
                record
            }
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns an account snapshot.
    pub fn account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .get(id)
            .map(|snapshot| snapshot.account)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Lists all accounts, oldest first.
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        self.store.list()
    }

    /// Lists a customer's accounts, oldest first.
    #[must_use]
    pub fn customer_accounts(&self, customer_id: CustomerId) -> Vec<Account> {
        self.store.list_by_customer(customer_id)
    }

    /// Lists an account's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist.
    pub fn transactions(
        &self,
        account_id: AccountId,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, LedgerError> {
        if self.store.get(account_id).is_none() {
            return Err(LedgerError::AccountNotFound(account_id));
        }
        Ok(self.log.list_by_account(account_id, page))
    }

    // ========================================================================
    // Commit cycle
    // ========================================================================

    fn commit(&self, op: OperationRequest) -> Result<(), LedgerError> {
        let amount = op.amount();
        for _ in 0..self.max_commit_attempts {
            let source = self.store.get(op.account_id());
            let target = op
                .target_account_id()
                .and_then(|target_id| self.store.get(target_id));

            validate_operation(
                &op,
                source.as_ref().map(|s| &s.account),
                target.as_ref().map(|t| &t.account),
            )?;

            // Validation passed, so the snapshots it required are present.
            let Some(source) = source else {
                return Err(LedgerError::AccountNotFound(op.account_id()));
            };

            let committed = if let Some(target) = target {
                self.store
                    .update_pair(
                        (source.account.id, source.version),
                        (target.account.id, target.version),
                        |a| a.balance -= amount,
                        |a| a.balance += amount,
                    )
                    .map(|_| ())
            } else if op.debits_source() {
                self.store
                    .update(source.account.id, source.version, |a| a.balance -= amount)
                    .map(|_| ())
            } else {
                self.store
                    .update(source.account.id, source.version, |a| a.balance += amount)
                    .map(|_| ())
            };

            match committed {
                Ok(()) => return Ok(()),
                // Another writer got in between the snapshot and the commit;
                // revalidate against fresh state.
                Err(StoreError::Conflict { .. }) => {}
                Err(StoreError::NotFound(id)) => {
                    return Err(if op.target_account_id() == Some(id) {
                        LedgerError::TargetAccountNotFound(id)
                    } else {
                        LedgerError::AccountNotFound(id)
                    });
                }
                Err(StoreError::DistinctAccountsRequired) => {
                    return Err(LedgerError::SameAccountTransfer);
                }
                Err(StoreError::Duplicate(id)) => return Err(LedgerError::Conflict(id)),
            }
        }
        Err(LedgerError::Conflict(op.account_id()))
    }

    fn transition(&self, id: AccountId, to: AccountStatus) -> Result<Account, LedgerError> {
        for _ in 0..self.max_commit_attempts {
            let Some(snapshot) = self.store.get(id) else {
                return Err(LedgerError::AccountNotFound(id));
            };
            validate_transition(&snapshot.account, to)?;

            match self.store.update(id, snapshot.version, |a| a.status = to) {
                Ok(account) => {
                    info!(
                        account_id = %id,
                        from = %snapshot.account.status,
                        to = %to,
                        "account status changed"
                    );
                    return Ok(account);
                }
                Err(StoreError::Conflict { .. }) => {}
                Err(_) => return Err(LedgerError::AccountNotFound(id)),
            }
        }
        Err(LedgerError::Conflict(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use corebank_core::{CustomerStatus, TransactionStatus, TransactionType};

    use crate::customers::InMemoryCustomerDirectory;

    fn service() -> (LedgerService, CustomerId) {
        let directory = Arc::new(InMemoryCustomerDirectory::new());
        let customer_id = CustomerId::new();
        directory.upsert(customer_id, CustomerStatus::Active);
        let service = LedgerService::new(directory, &LedgerConfig::default());
        (service, customer_id)
    }

    fn funded_account(service: &LedgerService, customer_id: CustomerId, amount: Decimal) -> Account {
        let account = service
            .open_account(customer_id, AccountType::Savings, Currency::Eur)
            .unwrap();
        if amount > Decimal::ZERO {
            let record = service.deposit(account.id, amount);
            assert_eq!(record.status, TransactionStatus::Success);
        }
        service.account(account.id).unwrap()
    }

    #[test]
    fn test_deposit_increases_balance() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(0));

        let record = service.deposit(account.id, dec!(100.50));
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(record.transaction_type, TransactionType::Deposit);
        assert_eq!(service.account(account.id).unwrap().balance, dec!(100.50));
    }

    #[test]
    fn test_withdraw_to_zero_then_overdraw() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(1000));

        let record = service.withdraw(account.id, dec!(1000));
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(service.account(account.id).unwrap().balance, dec!(0));

        let record = service.withdraw(account.id, dec!(1));
        assert_eq!(record.status, TransactionStatus::Failed);
        assert_eq!(record.failure_reason.as_deref(), Some("INSUFFICIENT_FUNDS"));
        assert_eq!(service.account(account.id).unwrap().balance, dec!(0));
    }

    #[test]
    fn test_transfer_moves_money_once() {
        let (service, customer_id) = service();
        let source = funded_account(&service, customer_id, dec!(500));
        let target = funded_account(&service, customer_id, dec!(0));

        let record = service.transfer(source.id, target.id, dec!(500));
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(record.target_account_id, Some(target.id));
        assert_eq!(service.account(source.id).unwrap().balance, dec!(0));
        assert_eq!(service.account(target.id).unwrap().balance, dec!(500));
    }

    #[test]
    fn test_failed_transfer_conserves_balances() {
        let (service, customer_id) = service();
        let source = funded_account(&service, customer_id, dec!(300));
        let target = funded_account(&service, customer_id, dec!(40));
        service.freeze(target.id).unwrap();

        let record = service.transfer(source.id, target.id, dec!(100));
        assert_eq!(record.status, TransactionStatus::Failed);
        assert_eq!(
            record.failure_reason.as_deref(),
            Some("TARGET_ACCOUNT_NOT_ACTIVE")
        );
        assert_eq!(service.account(source.id).unwrap().balance, dec!(300));
        assert_eq!(service.account(target.id).unwrap().balance, dec!(40));
    }

    #[test]
    fn test_transfer_to_self_rejected() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(100));

        let record = service.transfer(account.id, account.id, dec!(10));
        assert_eq!(record.status, TransactionStatus::Failed);
        assert_eq!(
            record.failure_reason.as_deref(),
            Some("SAME_ACCOUNT_TRANSFER")
        );
        assert_eq!(service.account(account.id).unwrap().balance, dec!(100));
    }

    #[test]
    fn test_payment_debits_like_withdrawal() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(80));

        let record = service.pay(account.id, dec!(79.99));
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(service.account(account.id).unwrap().balance, dec!(0.01));
    }

    #[test]
    fn test_frozen_account_rejects_deposit_until_activated() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(0));

        service.freeze(account.id).unwrap();
        let record = service.deposit(account.id, dec!(100));
        assert_eq!(record.status, TransactionStatus::Failed);
        assert_eq!(record.failure_reason.as_deref(), Some("ACCOUNT_NOT_ACTIVE"));

        service.activate(account.id).unwrap();
        let record = service.deposit(account.id, dec!(100));
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(service.account(account.id).unwrap().balance, dec!(100));
    }

    #[test]
    fn test_close_with_balance_rejected_and_status_unchanged() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(150));

        let result = service.close(account.id);
        assert_eq!(
            result,
            Err(LedgerError::NonZeroBalance {
                account_id: account.id,
                balance: dec!(150),
            })
        );
        assert_eq!(
            service.account(account.id).unwrap().status,
            AccountStatus::Active
        );
    }

    #[test]
    fn test_closed_account_is_terminal() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(0));
        service.close(account.id).unwrap();

        assert_eq!(
            service.activate(account.id),
            Err(LedgerError::AccountClosed(account.id))
        );
        assert_eq!(
            service.freeze(account.id),
            Err(LedgerError::AccountClosed(account.id))
        );
        let record = service.deposit(account.id, dec!(5));
        assert_eq!(record.status, TransactionStatus::Failed);
        assert_eq!(record.failure_reason.as_deref(), Some("ACCOUNT_NOT_ACTIVE"));
    }

    #[test]
    fn test_every_call_appends_exactly_one_record() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(50));

        // 1 deposit (seed) + 1 success + 2 failures.
        service.withdraw(account.id, dec!(10));
        service.withdraw(account.id, dec!(1000));
        service.deposit(account.id, dec!(-3));

        let page = service
            .transactions(account.id, PageRequest::default())
            .unwrap();
        assert_eq!(page.meta.total, 4);
        // Newest first: the invalid deposit is the most recent record.
        assert_eq!(page.data[0].failure_reason.as_deref(), Some("INVALID_AMOUNT"));
        assert_eq!(page.data[0].status, TransactionStatus::Failed);
    }

    #[test]
    fn test_transactions_for_unknown_account() {
        let (service, _) = service();
        assert!(matches!(
            service.transactions(AccountId::new(), PageRequest::default()),
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_open_account_requires_active_customer() {
        let directory = Arc::new(InMemoryCustomerDirectory::new());
        let customer_id = CustomerId::new();
        directory.upsert(customer_id, CustomerStatus::PendingKyc);
        let service = LedgerService::new(directory, &LedgerConfig::default());

        assert!(matches!(
            service.open_account(customer_id, AccountType::Savings, Currency::Eur),
            Err(LedgerError::CustomerNotActive { .. })
        ));
        assert!(matches!(
            service.open_account(CustomerId::new(), AccountType::Savings, Currency::Eur),
            Err(LedgerError::CustomerNotFound(_))
        ));
    }

    #[test]
    fn test_single_current_account_per_customer() {
        let (service, customer_id) = service();
        service
            .open_account(customer_id, AccountType::Current, Currency::Xof)
            .unwrap();

        assert_eq!(
            service.open_account(customer_id, AccountType::Current, Currency::Xof),
            Err(LedgerError::DuplicateCurrentAccount(customer_id))
        );
        // A savings account is still fine.
        assert!(service
            .open_account(customer_id, AccountType::Savings, Currency::Xof)
            .is_ok());
    }

    #[test]
    fn test_block_customer_accounts_skips_non_active() {
        let (service, customer_id) = service();
        let active = funded_account(&service, customer_id, dec!(0));
        let frozen = funded_account(&service, customer_id, dec!(0));
        service.freeze(frozen.id).unwrap();

        let blocked = service.block_customer_accounts(customer_id);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, active.id);
        assert_eq!(
            service.account(active.id).unwrap().status,
            AccountStatus::Blocked
        );
        assert_eq!(
            service.account(frozen.id).unwrap().status,
            AccountStatus::Frozen
        );
    }

    #[test]
    fn test_account_read_is_idempotent() {
        let (service, customer_id) = service();
        let account = funded_account(&service, customer_id, dec!(77));
        assert_eq!(
            service.account(account.id).unwrap(),
            service.account(account.id).unwrap()
        );
    }
}
