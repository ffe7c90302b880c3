//! Durable storage for registry snapshots
//!
//! Storage backends persist and restore the whole registry as a unit: one
//! record per account plus the next-identifier counter. The engine never
//! touches a backend directly; the glue here reads a consistent snapshot
//! from the registry outside any engine critical section and hands it to
//! the configured backend.

mod csv_file;
mod sqlite;

pub use csv_file::CsvStorage;
pub use sqlite::SqliteStorage;

use crate::core::AccountRegistry;
use crate::types::{Account, LedgerError};

/// Point-in-time copy of all persistent ledger state
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    /// All accounts, sorted by identifier
    pub accounts: Vec<Account>,
    /// Counter for the next identifier to allocate
    pub next_account_id: u64,
}

impl LedgerSnapshot {
    /// Snapshot representing a system with no accounts
    pub fn empty() -> Self {
        LedgerSnapshot {
            accounts: Vec::new(),
            next_account_id: 1,
        }
    }
}

impl Default for LedgerSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Capability interface for persistence backends
///
/// A save must either fully replace the prior persisted state or fail
/// without corrupting it. `load` returns an empty snapshot when no state
/// has been persisted yet, so first startup needs no special casing.
pub trait StorageBackend: Send + Sync {
    /// Persist the snapshot, replacing any prior state
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError>;

    /// Restore the most recently saved snapshot
    fn load(&self) -> Result<LedgerSnapshot, LedgerError>;
}

/// Save the registry's current state through the given backend
pub fn persist(backend: &dyn StorageBackend, registry: &AccountRegistry) -> Result<(), LedgerError> {
    let snapshot = LedgerSnapshot {
        accounts: registry.snapshot(),
        next_account_id: registry.next_account_id(),
    };
    backend.save(&snapshot)
}

/// Replace the registry's state with what the backend has persisted
///
/// Returns the number of accounts restored.
pub fn restore(backend: &dyn StorageBackend, registry: &AccountRegistry) -> Result<usize, LedgerError> {
    let snapshot = backend.load()?;
    let count = snapshot.accounts.len();
    registry.replace_all(snapshot.accounts, snapshot.next_account_id);
    Ok(count)
}
