//! Transaction engine
//!
//! The engine executes money-moving operations against the registry with
//! all-or-nothing semantics: it acquires the locks of every involved
//! account in lexicographic identifier order, snapshots their balances,
//! applies the mutation through the unlocked [`Account`] primitives, and
//! restores the snapshot on any failure. Exactly one [`OperationRecord`]
//! is emitted per attempt, after all locks are released.
//!
//! The sorted acquisition order is the deadlock-avoidance invariant: two
//! operations touching accounts A and B both lock whichever identifier
//! sorts first, so no cycle of waits can form. Public operations never
//! call each other while holding locks (the locks are not re-entrant);
//! they share the unlocked primitives instead.

use crate::audit::AuditLog;
use crate::core::registry::AccountRegistry;
use crate::types::{Account, AccountId, Action, LedgerError, OperationRecord};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Thread-safe transaction execution engine
///
/// Shared service over the registry's mutable state. Cloning the `Arc`s
/// and calling from any number of threads is supported; operations on
/// disjoint account sets run fully in parallel.
pub struct TransactionEngine {
    registry: Arc<AccountRegistry>,
    audit: Arc<dyn AuditLog>,
}

impl TransactionEngine {
    /// Create an engine over the given registry and audit log
    pub fn new(registry: Arc<AccountRegistry>, audit: Arc<dyn AuditLog>) -> Self {
        TransactionEngine { registry, audit }
    }

    /// The registry this engine operates on
    pub fn registry(&self) -> &Arc<AccountRegistry> {
        &self.registry
    }

    /// Create a new account and return its identifier
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for a blank owner name or `NegativeBalance`
    /// for a negative starting balance; no account is created and the
    /// identifier counter is unchanged.
    pub fn create_account(
        &self,
        owner_name: &str,
        starting_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        let result = self.registry.create_account(owner_name, starting_balance);

        let record = match &result {
            Ok(id) => {
                debug!(account = %id, balance = %starting_balance, "account created");
                OperationRecord::success(
                    Action::CreateAccount,
                    vec![id.clone()],
                    Some(starting_balance),
                )
            }
            Err(err) => OperationRecord::failure(
                Action::CreateAccount,
                Vec::new(),
                Some(starting_balance),
                err,
            ),
        };
        self.audit.record(&record);

        result
    }

    /// Deposit funds into an account, returning the new balance
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InvalidAmount`; the account is
    /// unchanged on failure.
    pub fn deposit(&self, account_id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let result = self.apply_single(account_id, |account| account.credit(amount));
        self.record_single(Action::Deposit, account_id, amount, &result);
        result
    }

    /// Withdraw funds from an account, returning the new balance
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `InvalidAmount`, or `InsufficientFunds`;
    /// the account is unchanged on failure.
    pub fn withdraw(&self, account_id: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let result = self.apply_single(account_id, |account| account.debit(amount));
        self.record_single(Action::Withdraw, account_id, amount, &result);
        result
    }

    /// Move funds between two accounts, returning both new balances
    ///
    /// The debit and credit happen within one locked, snapshotted scope:
    /// either both apply or neither does, so the total balance across all
    /// accounts is conserved by every successful call and untouched by
    /// every failed one.
    ///
    /// # Errors
    ///
    /// Returns `SameAccount`, `AccountNotFound` (either side),
    /// `InvalidAmount`, or `InsufficientFunds`; neither account is changed
    /// on failure.
    pub fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: Decimal,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        let result = self.transfer_locked(from_id, to_id, amount);

        let record = match &result {
            Ok((from_balance, to_balance)) => {
                debug!(
                    from = %from_id,
                    to = %to_id,
                    amount = %amount,
                    from_balance = %from_balance,
                    to_balance = %to_balance,
                    "transfer committed"
                );
                OperationRecord::success(
                    Action::Transfer,
                    vec![from_id.to_string(), to_id.to_string()],
                    Some(amount),
                )
            }
            Err(err) => OperationRecord::failure(
                Action::Transfer,
                vec![from_id.to_string(), to_id.to_string()],
                Some(amount),
                err,
            ),
        };
        self.audit.record(&record);

        result
    }

    /// Run a mutation against one locked account with rollback on failure
    fn apply_single<F>(&self, account_id: &str, mutate: F) -> Result<Decimal, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<(), LedgerError>,
    {
        let handle = self.registry.handle(account_id)?;
        let mut account = handle.lock();
        let before = account.balance;

        match mutate(&mut account) {
            Ok(()) => Ok(account.balance),
            Err(err) => {
                account.balance = before;
                Err(err)
            }
        }
    }

    /// The locked critical section of a transfer
    ///
    /// Audit recording happens in the caller, after the guards dropped.
    fn transfer_locked(
        &self,
        from_id: &str,
        to_id: &str,
        amount: Decimal,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        if from_id == to_id {
            return Err(LedgerError::same_account(from_id));
        }

        let from_handle = self.registry.handle(from_id)?;
        let to_handle = self.registry.handle(to_id)?;

        // Lock both accounts in lexicographic identifier order. Every
        // operation uses the same global order, so opposing transfers
        // contend but never deadlock.
        let (mut first, mut second) = if from_id < to_id {
            let first = from_handle.lock();
            let second = to_handle.lock();
            (first, second)
        } else {
            let first = to_handle.lock();
            let second = from_handle.lock();
            (first, second)
        };
        let (from, to) = if from_id < to_id {
            (&mut *first, &mut *second)
        } else {
            (&mut *second, &mut *first)
        };

        // Rollback point
        let from_before = from.balance;
        let to_before = to.balance;

        if let Err(err) = from.debit(amount).and_then(|()| to.credit(amount)) {
            from.balance = from_before;
            to.balance = to_before;
            return Err(err);
        }

        Ok((from.balance, to.balance))
    }

    /// Emit the audit record for a single-account operation
    fn record_single(
        &self,
        action: Action,
        account_id: &str,
        amount: Decimal,
        result: &Result<Decimal, LedgerError>,
    ) {
        let record = match result {
            Ok(balance) => {
                debug!(account = %account_id, amount = %amount, balance = %balance, "operation committed");
                OperationRecord::success(action, vec![account_id.to_string()], Some(amount))
            }
            Err(err) => {
                OperationRecord::failure(action, vec![account_id.to_string()], Some(amount), err)
            }
        };
        self.audit.record(&record);
    }
}
