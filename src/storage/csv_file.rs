//! Flat-file storage backend
//!
//! Persists the ledger snapshot as a CSV file with one row per account and
//! one `SYSTEM` row carrying the next-identifier counter. Saves go through
//! a sibling temp file and an atomic rename, so a failed save never
//! corrupts the previously persisted state.
//!
//! Layout:
//!
//! ```csv
//! id,owner_name,balance,created_at
//! SYSTEM,,3,
//! ACC0001,Alice,1000.00,2026-08-26T12:00:00Z
//! ```
//!
//! Balances are written with `Decimal`'s canonical string form and parsed
//! back exactly, so repeated save/load cycles are lossless.

use super::{LedgerSnapshot, StorageBackend};
use crate::types::{Account, LedgerError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Identifier of the system record row
const SYSTEM_ROW_ID: &str = "SYSTEM";

/// CSV-file storage backend
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    /// Create a backend persisting to the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStorage { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "accounts.csv".to_string());
        self.path.with_file_name(format!("{file_name}.tmp"))
    }
}

impl StorageBackend for CsvStorage {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut writer = csv::Writer::from_path(&temp_path)?;

            writer.write_record(["id", "owner_name", "balance", "created_at"])?;

            // System record: the counter rides in the balance column
            let counter = snapshot.next_account_id.to_string();
            writer.write_record([SYSTEM_ROW_ID, "", counter.as_str(), ""])?;

            for account in &snapshot.accounts {
                let balance = account.balance.to_string();
                let created_at = account.created_at.to_rfc3339();
                writer.write_record([
                    account.id.as_str(),
                    account.owner_name.as_str(),
                    balance.as_str(),
                    created_at.as_str(),
                ])?;
            }

            writer.flush()?;
        }

        // The rename makes the new state visible all at once
        fs::rename(&temp_path, &self.path)?;

        info!(path = %self.path.display(), accounts = snapshot.accounts.len(), "saved ledger to CSV");
        Ok(())
    }

    fn load(&self) -> Result<LedgerSnapshot, LedgerError> {
        if !self.path.exists() {
            return Ok(LedgerSnapshot::empty());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut snapshot = LedgerSnapshot::empty();

        for result in reader.records() {
            let record = result?;
            let id = record.get(0).unwrap_or_default();

            if id == SYSTEM_ROW_ID {
                let raw = record.get(2).unwrap_or_default();
                snapshot.next_account_id = raw.parse().map_err(|_| {
                    LedgerError::storage_failure(format!("invalid next_account_id: '{raw}'"))
                })?;
                continue;
            }

            let owner_name = record.get(1).unwrap_or_default().to_string();

            let raw_balance = record.get(2).unwrap_or_default();
            let balance = Decimal::from_str(raw_balance).map_err(|_| {
                LedgerError::storage_failure(format!("invalid balance '{raw_balance}' for {id}"))
            })?;

            let raw_created = record.get(3).unwrap_or_default();
            let created_at = DateTime::parse_from_rfc3339(raw_created)
                .map_err(|_| {
                    LedgerError::storage_failure(format!(
                        "invalid created_at '{raw_created}' for {id}"
                    ))
                })?
                .with_timezone(&Utc);

            snapshot.accounts.push(Account {
                id: id.to_string(),
                owner_name,
                balance,
                created_at,
            });
        }

        snapshot.accounts.sort_by(|a, b| a.id.cmp(&b.id));

        info!(path = %self.path.display(), accounts = snapshot.accounts.len(), "loaded ledger from CSV");
        Ok(snapshot)
    }
}
