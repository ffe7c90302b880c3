//! File-based audit sink
//!
//! Appends one JSON object per line to a log file. Decimal amounts
//! serialize as exact strings, so the audit trail never suffers float
//! drift.

use super::AuditLog;
use crate::types::OperationRecord;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Audit log that appends JSON lines to a file
pub struct FileAuditLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileAuditLog {
    /// Open the log file in append mode, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(FileAuditLog {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record in the file, oldest first
    ///
    /// Lines that fail to parse are skipped with a warning; a partially
    /// written trailing line must not make the whole log unreadable.
    pub fn read_all(&self) -> std::io::Result<Vec<OperationRecord>> {
        // Flush buffered records so the read sees them
        self.writer.lock().flush()?;

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(err) => warn!(error = %err, "skipping unparseable audit line"),
            }
        }

        Ok(records)
    }
}

impl AuditLog for FileAuditLog {
    fn record(&self, record: &OperationRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "failed to serialize audit record");
                return;
            }
        };

        let mut writer = self.writer.lock();
        if let Err(err) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            warn!(error = %err, "failed to write audit record");
        }
    }
}
