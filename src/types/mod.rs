//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the Account record and its balance primitives
//! - `record`: operation records consumed by the audit log
//! - `error`: error types for the ledger core

pub mod account;
pub mod error;
pub mod record;

pub use account::{Account, AccountId};
pub use error::LedgerError;
pub use record::{Action, OperationRecord, Outcome};
