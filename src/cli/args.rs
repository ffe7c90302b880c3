use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Simple banking ledger with atomic transactions and pluggable persistence
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Interactive banking ledger with atomic transactions", long_about = None)]
pub struct CliArgs {
    /// Storage backend for persisting account state
    #[arg(
        long = "storage",
        value_name = "BACKEND",
        default_value = "csv",
        help = "Storage backend: 'csv' for a flat file or 'sqlite' for an embedded database"
    )]
    pub storage: StorageKind,

    /// Path of the persisted ledger state
    #[arg(
        long = "data-file",
        value_name = "PATH",
        help = "Data file path (default: accounts.csv for csv, ledger.db for sqlite)"
    )]
    pub data_file: Option<PathBuf>,

    /// Path of the audit log file
    #[arg(
        long = "audit-log",
        value_name = "PATH",
        default_value = "transactions.log",
        help = "Audit log file receiving one JSON record per attempted operation"
    )]
    pub audit_log: PathBuf,

    /// Skip restoring persisted state at startup
    #[arg(long = "no-load", help = "Start with an empty ledger instead of loading the data file")]
    pub no_load: bool,
}

/// Available storage backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    Csv,
    Sqlite,
}

impl CliArgs {
    /// Effective data-file path, falling back to the backend's default
    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| match self.storage {
            StorageKind::Csv => PathBuf::from("accounts.csv"),
            StorageKind::Sqlite => PathBuf::from("ledger.db"),
        })
    }
}
