//! Embedded SQLite storage backend
//!
//! Persists the snapshot to two tables: `accounts` (one row per account,
//! balance stored as a canonical decimal string) and `system_metadata`
//! (the next-identifier counter). A save deletes and re-inserts everything
//! inside a single SQL transaction, so the persisted state is replaced
//! atomically or not at all.

use super::{LedgerSnapshot, StorageBackend};
use crate::types::{Account, LedgerError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    account_id TEXT PRIMARY KEY,
    owner_name TEXT NOT NULL,
    balance    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS system_metadata (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// SQLite storage backend
///
/// The connection lives behind a mutex: backends are shared between the
/// startup/shutdown glue and the menu's explicit save/load, and rusqlite
/// connections are not `Sync`.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (used in tests)
    pub fn in_memory() -> Result<Self, LedgerError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LedgerError> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStorage {
            conn: Mutex::new(conn),
        })
    }
}

impl StorageBackend for SqliteStorage {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), LedgerError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM accounts", [])?;
        for account in &snapshot.accounts {
            tx.execute(
                "INSERT INTO accounts (account_id, owner_name, balance, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    account.id,
                    account.owner_name,
                    account.balance.to_string(),
                    account.created_at.to_rfc3339(),
                ],
            )?;
        }

        tx.execute(
            "INSERT OR REPLACE INTO system_metadata (key, value) VALUES ('next_account_id', ?1)",
            params![snapshot.next_account_id.to_string()],
        )?;

        tx.commit()?;

        info!(accounts = snapshot.accounts.len(), "saved ledger to SQLite");
        Ok(())
    }

    fn load(&self) -> Result<LedgerSnapshot, LedgerError> {
        let conn = self.conn.lock();
        let mut snapshot = LedgerSnapshot::empty();

        let mut stmt = conn.prepare(
            "SELECT account_id, owner_name, balance, created_at FROM accounts ORDER BY account_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        for row in rows {
            let (id, owner_name, raw_balance, raw_created) = row?;

            let balance = Decimal::from_str(&raw_balance).map_err(|_| {
                LedgerError::storage_failure(format!("invalid balance '{raw_balance}' for {id}"))
            })?;
            let created_at = DateTime::parse_from_rfc3339(&raw_created)
                .map_err(|_| {
                    LedgerError::storage_failure(format!(
                        "invalid created_at '{raw_created}' for {id}"
                    ))
                })?
                .with_timezone(&Utc);

            snapshot.accounts.push(Account {
                id,
                owner_name,
                balance,
                created_at,
            });
        }

        let next: Option<String> = conn
            .query_row(
                "SELECT value FROM system_metadata WHERE key = 'next_account_id'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(raw) = next {
            snapshot.next_account_id = raw.parse().map_err(|_| {
                LedgerError::storage_failure(format!("invalid next_account_id: '{raw}'"))
            })?;
        }

        info!(accounts = snapshot.accounts.len(), "loaded ledger from SQLite");
        Ok(snapshot)
    }
}
