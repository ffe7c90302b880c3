//! Account type for the ledger core
//!
//! This module defines the Account structure together with the unlocked
//! balance primitives the transaction engine builds on.

use crate::types::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unique account identifier
///
/// Opaque string of the form `ACC` + zero-padded sequence (e.g., `ACC0001`).
pub type AccountId = String;

/// A single bank account
///
/// Holds the owner's name and the current balance. Balances are exact
/// decimals and never negative at any externally observable point; all
/// mutation goes through [`Account::credit`] and [`Account::debit`], which
/// the engine invokes only while the account's lock is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, immutable after creation
    pub id: AccountId,

    /// Name of the account holder, non-empty, immutable
    pub owner_name: String,

    /// Current balance
    ///
    /// Invariant: `balance >= 0` between operations. The engine may hold an
    /// account in a transient state behind its lock, but every exit path
    /// restores this invariant before the lock is released.
    pub balance: Decimal,

    /// Creation time of the account
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with the given identifier, owner, and balance
    pub fn new(id: AccountId, owner_name: impl Into<String>, balance: Decimal) -> Self {
        Account {
            id,
            owner_name: owner_name.into(),
            balance,
            created_at: Utc::now(),
        }
    }

    /// Credit funds to the account
    ///
    /// Increases the balance by `amount`. No upper bound is enforced beyond
    /// the decimal range; overflow is rejected with checked arithmetic.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative (`InvalidAmount`)
    /// - adding `amount` would overflow the decimal range (`ArithmeticOverflow`)
    pub fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(&self.id))?;

        Ok(())
    }

    /// Debit funds from the account
    ///
    /// Decreases the balance by `amount`. Overdrafts are rejected, so the
    /// balance never goes below zero.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative (`InvalidAmount`)
    /// - `amount` exceeds the current balance (`InsufficientFunds`)
    pub fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        if amount > self.balance {
            return Err(LedgerError::insufficient_funds(
                &self.id,
                self.balance,
                amount,
            ));
        }

        // Cannot underflow after the balance check above
        self.balance -= amount;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account(balance: Decimal) -> Account {
        Account::new("ACC0001".to_string(), "Alice", balance)
    }

    #[test]
    fn test_new_sets_fields() {
        let acct = account(Decimal::new(100000, 2));

        assert_eq!(acct.id, "ACC0001");
        assert_eq!(acct.owner_name, "Alice");
        assert_eq!(acct.balance, Decimal::new(100000, 2));
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut acct = account(Decimal::new(100000, 2)); // 1000.00

        acct.credit(Decimal::new(50000, 2)).unwrap(); // 500.00

        assert_eq!(acct.balance, Decimal::new(150000, 2));
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-100, 2))]
    fn test_credit_rejects_non_positive_amount(#[case] amount: Decimal) {
        let mut acct = account(Decimal::new(100000, 2));

        let result = acct.credit(amount);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvalidAmount { .. }
        ));
        assert_eq!(acct.balance, Decimal::new(100000, 2));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let mut acct = account(Decimal::new(100000, 2));

        acct.debit(Decimal::new(25000, 2)).unwrap(); // 250.00

        assert_eq!(acct.balance, Decimal::new(75000, 2));
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-100, 2))]
    fn test_debit_rejects_non_positive_amount(#[case] amount: Decimal) {
        let mut acct = account(Decimal::new(100000, 2));

        let result = acct.debit(amount);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InvalidAmount { .. }
        ));
        assert_eq!(acct.balance, Decimal::new(100000, 2));
    }

    #[test]
    fn test_debit_rejects_overdraft() {
        let mut acct = account(Decimal::new(150000, 2)); // 1500.00

        let result = acct.debit(Decimal::new(200000, 2)); // 2000.00

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientFunds { .. }
        ));
        assert_eq!(acct.balance, Decimal::new(150000, 2));
    }

    #[test]
    fn test_debit_entire_balance_reaches_zero() {
        let mut acct = account(Decimal::new(100000, 2));

        acct.debit(Decimal::new(100000, 2)).unwrap();

        assert_eq!(acct.balance, Decimal::ZERO);
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let mut acct = account(Decimal::MAX);

        let result = acct.credit(Decimal::ONE);

        if let Err(err) = result {
            assert!(matches!(err, LedgerError::ArithmeticOverflow { .. }));
            assert_eq!(acct.balance, Decimal::MAX);
        }
    }

    #[test]
    fn test_repeated_operations_keep_exact_precision() {
        let mut acct = account(Decimal::ZERO);

        // 0.10 credited ten times must be exactly 1.00
        for _ in 0..10 {
            acct.credit(Decimal::new(10, 2)).unwrap();
        }

        assert_eq!(acct.balance, Decimal::new(100, 2));
    }
}
