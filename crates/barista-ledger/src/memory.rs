//! In-memory ledger for tests and ephemeral deployments.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use barista_core::types::OrderStatus;

use crate::error::LedgerError;
use crate::record::OrderRecord;
use crate::Ledger;

/// Ledger backed by a `Vec`. `fail_writes` turns every append into an I/O
/// error, for exercising the ledger-down path.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<OrderRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent appends fail, simulating an unreachable ledger.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("ledger lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append(&self, record: &OrderRecord) -> Result<(), LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "ledger unavailable",
            )));
        }
        self.rows
            .lock()
            .expect("ledger lock poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<OrderRecord>, LedgerError> {
        Ok(self.rows.lock().expect("ledger lock poisoned").clone())
    }

    async fn update_status(
        &self,
        row_index: usize,
        status: OrderStatus,
    ) -> Result<(), LedgerError> {
        let mut rows = self.rows.lock().expect("ledger lock poisoned");
        let len = rows.len();
        let record = rows.get_mut(row_index).ok_or(LedgerError::OutOfRange {
            index: row_index,
            len,
        })?;
        record.status = status;
        Ok(())
    }
}
