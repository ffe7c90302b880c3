//! Operation records consumed by the audit log
//!
//! The engine produces exactly one [`OperationRecord`] per attempted
//! operation, success or failure. Records are immutable once created and
//! serialize to one JSON object per audit-log line.

use crate::types::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operations the engine can attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Allocate an identifier and insert a new account
    CreateAccount,
    /// Credit a single account
    Deposit,
    /// Debit a single account
    Withdraw,
    /// Move funds between two accounts atomically
    Transfer,
}

/// Outcome of an attempted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

/// One audit record per attempted operation
///
/// `account_ids` holds one identifier for deposit/withdraw/create, two for
/// transfer (source first). `reason` is a stable reason code and present
/// only on failure. The record is written after the operation's locks are
/// released, so slow audit sinks never extend lock hold time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// The attempted operation
    pub action: Action,

    /// The account identifiers involved
    pub account_ids: Vec<String>,

    /// Amount involved, absent for account creation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Whether the operation committed or was rejected
    pub outcome: Outcome,

    /// Reason code, present when `outcome` is `Failure`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Operation completion time
    pub timestamp: DateTime<Utc>,
}

impl OperationRecord {
    /// Build a success record
    pub fn success(action: Action, account_ids: Vec<String>, amount: Option<Decimal>) -> Self {
        OperationRecord {
            action,
            account_ids,
            amount,
            outcome: Outcome::Success,
            reason: None,
            timestamp: Utc::now(),
        }
    }

    /// Build a failure record carrying the error's reason code
    pub fn failure(
        action: Action,
        account_ids: Vec<String>,
        amount: Option<Decimal>,
        error: &LedgerError,
    ) -> Self {
        OperationRecord {
            action,
            account_ids,
            amount,
            outcome: Outcome::Failure,
            reason: Some(error.reason_code().to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Whether the record mentions the given account
    pub fn involves(&self, account_id: &str) -> bool {
        self.account_ids.iter().any(|id| id == account_id)
    }
}
