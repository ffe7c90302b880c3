//! Bank Ledger CLI
//!
//! Interactive command-line front-end for the ledger core.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --storage sqlite --data-file ledger.db
//! cargo run -- --audit-log audit/transactions.log --no-load
//! ```
//!
//! On startup the persisted ledger state is restored from the configured
//! backend (unless `--no-load` is given); on exit the current state is
//! saved back. Every attempted operation is appended to the audit log as
//! one JSON record.

use anyhow::Context;
use bank_ledger::cli::{self, StorageKind};
use bank_ledger::{
    storage, AccountRegistry, AuditLog, CsvStorage, FileAuditLog, SqliteStorage, StorageBackend,
    TransactionEngine,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let data_file = args.data_file();

    let backend: Box<dyn StorageBackend> = match args.storage {
        StorageKind::Csv => Box::new(CsvStorage::new(&data_file)),
        StorageKind::Sqlite => Box::new(
            SqliteStorage::open(&data_file)
                .with_context(|| format!("opening database {}", data_file.display()))?,
        ),
    };

    let audit = Arc::new(
        FileAuditLog::open(&args.audit_log)
            .with_context(|| format!("opening audit log {}", args.audit_log.display()))?,
    );

    let registry = Arc::new(AccountRegistry::new());
    if !args.no_load {
        let count = storage::restore(backend.as_ref(), &registry)
            .with_context(|| format!("loading ledger state from {}", data_file.display()))?;
        info!(accounts = count, "restored ledger state");
    }

    let engine = TransactionEngine::new(
        Arc::clone(&registry),
        Arc::clone(&audit) as Arc<dyn AuditLog>,
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    cli::menu::run(
        &engine,
        backend.as_ref(),
        Some(&audit),
        stdin.lock(),
        stdout.lock(),
    )?;

    storage::persist(backend.as_ref(), &registry)
        .with_context(|| format!("saving ledger state to {}", data_file.display()))?;
    info!("ledger state saved on exit");

    Ok(())
}
