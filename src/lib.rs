//! Bank Ledger Library
//! # Overview
//!
//! This library provides a single-process ledger core: accounts, a
//! thread-safe transaction engine with all-or-nothing semantics, an audit
//! log of every attempted operation, and pluggable durable storage.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, OperationRecord, LedgerError)
//! - [`core`] - Business logic components:
//!   - [`core::registry`] - Authoritative in-memory account state and identifier allocation
//!   - [`core::engine`] - Atomic operation execution with ordered per-account locking
//! - [`audit`] - Audit log interface and sinks (file, memory, null)
//! - [`storage`] - Snapshot persistence (CSV flat file, embedded SQLite)
//! - [`cli`] - Argument parsing and the interactive menu front-end
//!
//! # Operations
//!
//! The engine supports four operations:
//!
//! - **Create account**: allocate the next `ACCnnnn` identifier and insert a new account
//! - **Deposit**: credit funds to an account
//! - **Withdraw**: debit funds from an account (requires sufficient balance)
//! - **Transfer**: move funds between two accounts atomically
//!
//! # Concurrency
//!
//! Any number of threads may call the engine concurrently. Each operation
//! locks the accounts it touches in lexicographic identifier order, so
//! operations on overlapping accounts serialize without ever deadlocking,
//! while operations on disjoint accounts run in parallel. Audit and
//! storage I/O happen outside the locked critical sections.

pub mod audit;
pub mod cli;
pub mod core;
pub mod storage;
pub mod types;

pub use crate::core::{AccountRegistry, TransactionEngine};
pub use audit::{AuditLog, FileAuditLog, MemoryAuditLog, NullAuditLog};
pub use storage::{CsvStorage, LedgerSnapshot, SqliteStorage, StorageBackend};
pub use types::{Account, AccountId, Action, LedgerError, OperationRecord, Outcome};
