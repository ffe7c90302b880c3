//! Error types for the ledger core
//!
//! This module defines all error conditions the engine, registry, and
//! storage backends can report.
//!
//! # Error Categories
//!
//! - **Validation Errors**: bad owner name, negative starting balance,
//!   non-positive amounts, transfer to the same account
//! - **Business Rejections**: insufficient funds, unknown account
//! - **Storage Errors**: backend save/load failures
//! - **Arithmetic Errors**: decimal overflow in balance calculations
//!
//! Expected business conditions are reported as structured failure outcomes
//! with a stable reason code (see [`LedgerError::reason_code`]), which is
//! what ends up in the audit log.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger core
///
/// Each variant carries enough context to produce a useful message for
/// CLI output and a stable reason code for audit records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Empty or blank owner name on account creation
    #[error("Account holder name must not be empty")]
    InvalidName,

    /// Negative starting balance on account creation
    #[error("Starting balance cannot be negative: {balance}")]
    NegativeBalance {
        /// The rejected starting balance
        balance: Decimal,
    },

    /// Non-positive amount on deposit, withdrawal, or transfer
    #[error("Amount must be positive: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Debit amount exceeds the current balance
    ///
    /// The operation is rejected and the account state remains unchanged.
    #[error("Insufficient funds in {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account identifier
        account: String,
        /// Current balance
        balance: Decimal,
        /// Requested debit amount
        requested: Decimal,
    },

    /// Referenced account identifier does not exist
    #[error("Account not found: {account}")]
    AccountNotFound {
        /// The unknown identifier
        account: String,
    },

    /// Transfer source equals destination
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount {
        /// The identifier used on both sides
        account: String,
    },

    /// Arithmetic overflow would occur in a balance calculation
    ///
    /// The operation is rejected to maintain account integrity.
    #[error("Arithmetic overflow updating balance of {account}")]
    ArithmeticOverflow {
        /// Account identifier
        account: String,
    },

    /// Storage backend save/load could not complete
    ///
    /// Propagated to the caller; in-memory registry state is unaffected
    /// because persistence is a separate step from balance mutation.
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// Description of the backend failure
        message: String,
    },
}

impl LedgerError {
    /// Create a NegativeBalance error
    pub fn negative_balance(balance: Decimal) -> Self {
        LedgerError::NegativeBalance { balance }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account: &str) -> Self {
        LedgerError::SameAccount {
            account: account.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            account: account.to_string(),
        }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }

    /// Stable snake_case reason code for audit records
    pub fn reason_code(&self) -> &'static str {
        match self {
            LedgerError::InvalidName => "invalid_name",
            LedgerError::NegativeBalance { .. } => "negative_balance",
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::SameAccount { .. } => "same_account",
            LedgerError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            LedgerError::StorageFailure { .. } => "storage_failure",
        }
    }
}

// Conversion from io::Error, used by the storage backends
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::StorageFailure {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error, used by the flat-file backend
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::StorageFailure {
            message: error.to_string(),
        }
    }
}

// Conversion from rusqlite::Error, used by the SQLite backend
impl From<rusqlite::Error> for LedgerError {
    fn from(error: rusqlite::Error) -> Self {
        LedgerError::StorageFailure {
            message: error.to_string(),
        }
    }
}
