//! In-memory audit sink
//!
//! Retains records for assertions in tests and for in-process queries.

use super::AuditLog;
use crate::types::{Action, OperationRecord};
use parking_lot::RwLock;

/// Audit log that keeps all records in memory
pub struct MemoryAuditLog {
    records: RwLock<Vec<OperationRecord>>,
}

impl MemoryAuditLog {
    /// Create an empty in-memory log
    pub fn new() -> Self {
        MemoryAuditLog {
            records: RwLock::new(Vec::new()),
        }
    }

    /// All records, in emission order
    pub fn records(&self) -> Vec<OperationRecord> {
        self.records.read().clone()
    }

    /// Records that mention the given account
    pub fn records_for_account(&self, account_id: &str) -> Vec<OperationRecord> {
        self.records
            .read()
            .iter()
            .filter(|record| record.involves(account_id))
            .cloned()
            .collect()
    }

    /// Records for the given action
    pub fn records_for_action(&self, action: Action) -> Vec<OperationRecord> {
        self.records
            .read()
            .iter()
            .filter(|record| record.action == action)
            .cloned()
            .collect()
    }

    /// Discard all retained records
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl Default for MemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, record: &OperationRecord) {
        self.records.write().push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerError;
    use rust_decimal::Decimal;

    fn sample(action: Action, ids: &[&str]) -> OperationRecord {
        OperationRecord::success(
            action,
            ids.iter().map(|s| s.to_string()).collect(),
            Some(Decimal::ONE),
        )
    }

    #[test]
    fn test_records_are_retained_in_order() {
        let log = MemoryAuditLog::new();

        log.record(&sample(Action::Deposit, &["ACC0001"]));
        log.record(&sample(Action::Withdraw, &["ACC0001"]));

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, Action::Deposit);
        assert_eq!(records[1].action, Action::Withdraw);
    }

    #[test]
    fn test_filter_by_account() {
        let log = MemoryAuditLog::new();
        log.record(&sample(Action::Deposit, &["ACC0001"]));
        log.record(&sample(Action::Transfer, &["ACC0001", "ACC0002"]));
        log.record(&sample(Action::Deposit, &["ACC0003"]));

        let records = log.records_for_account("ACC0001");

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_filter_by_action() {
        let log = MemoryAuditLog::new();
        log.record(&sample(Action::Deposit, &["ACC0001"]));
        log.record(&OperationRecord::failure(
            Action::Withdraw,
            vec!["ACC0001".to_string()],
            Some(Decimal::TEN),
            &LedgerError::insufficient_funds("ACC0001", Decimal::ONE, Decimal::TEN),
        ));

        assert_eq!(log.records_for_action(Action::Withdraw).len(), 1);
        assert_eq!(log.records_for_action(Action::Transfer).len(), 0);
    }

    #[test]
    fn test_clear_discards_records() {
        let log = MemoryAuditLog::new();
        log.record(&sample(Action::Deposit, &["ACC0001"]));

        log.clear();

        assert!(log.records().is_empty());
    }
}
