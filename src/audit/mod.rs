//! Audit log interface and sinks
//!
//! Every attempted operation produces one [`OperationRecord`], which the
//! engine hands to an [`AuditLog`] after releasing its locks. Recording is
//! fire-and-forget: a sink that cannot write logs a warning and drops the
//! record, but never blocks or reverts a banking operation.

mod file;
mod memory;

pub use file::FileAuditLog;
pub use memory::MemoryAuditLog;

use crate::types::OperationRecord;

/// Sink for operation records
///
/// Implementations must be safe to share across the engine's caller
/// threads; `record` is called outside any account lock.
pub trait AuditLog: Send + Sync {
    /// Record one attempted operation
    fn record(&self, record: &OperationRecord);
}

/// Audit log that discards every record
///
/// Useful when callers want engine semantics without any audit output.
pub struct NullAuditLog;

impl AuditLog for NullAuditLog {
    fn record(&self, _record: &OperationRecord) {}
}
