//! Core business logic module
//!
//! This module contains the ledger's core components:
//! - `registry` - authoritative in-memory account state and identifier allocation
//! - `engine` - atomic transaction execution with ordered per-account locking

pub mod engine;
pub mod registry;

pub use engine::TransactionEngine;
pub use registry::AccountRegistry;
