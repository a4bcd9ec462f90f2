//! File-backed ledger: one JSON row per line, header line first.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use barista_core::types::OrderStatus;

use crate::error::LedgerError;
use crate::record::{OrderRecord, HEADER};
use crate::Ledger;

/// Append-only ledger file. Status updates rewrite the addressed row in
/// place; all file access is serialized by an internal lock.
pub struct FileLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLedger {
    /// Open (or create) a ledger file at `path`, writing the header line if
    /// the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            let header = serde_json::to_string(&HEADER)?;
            std::fs::write(&path, format!("{}\n", header))?;
            info!(path = %path.display(), "Ledger file created");
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>, LedgerError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content.lines().map(String::from).collect())
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn append(&self, record: &OrderRecord) -> Result<(), LedgerError> {
        let line = serde_json::to_string(&record.to_row()?)?;
        let _guard = self.lock.lock().expect("ledger lock poisoned");
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<OrderRecord>, LedgerError> {
        let _guard = self.lock.lock().expect("ledger lock poisoned");
        let lines = self.read_lines()?;
        lines
            .iter()
            .skip(1) // header
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                let row = serde_json::from_str(l)?;
                OrderRecord::from_row(&row)
            })
            .collect()
    }

    async fn update_status(
        &self,
        row_index: usize,
        status: OrderStatus,
    ) -> Result<(), LedgerError> {
        let _guard = self.lock.lock().expect("ledger lock poisoned");
        let mut lines = self.read_lines()?;
        let data_rows = lines.len().saturating_sub(1);
        if row_index >= data_rows {
            return Err(LedgerError::OutOfRange {
                index: row_index,
                len: data_rows,
            });
        }

        let line = &lines[row_index + 1];
        let row = serde_json::from_str(line)?;
        let mut record = OrderRecord::from_row(&row)?;
        record.status = status;
        lines[row_index + 1] = serde_json::to_string(&record.to_row()?)?;

        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
