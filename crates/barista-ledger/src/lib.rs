//! Order ledger: append-only persistent store of finalized orders with
//! mutable per-order status.
//!
//! Rows have the shape `[timestamp, customer_name, items-JSON, total,
//! status, order_number]` and are addressed by ordinal position (the header
//! row is not counted).

pub mod error;
pub mod file;
pub mod memory;
pub mod record;

use async_trait::async_trait;

use barista_core::types::OrderStatus;

pub use error::LedgerError;
pub use file::FileLedger;
pub use memory::MemoryLedger;
pub use record::OrderRecord;

/// The external ledger contract.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append a finalized order row.
    async fn append(&self, record: &OrderRecord) -> Result<(), LedgerError>;

    /// All data rows in append order, header skipped.
    async fn read_all(&self) -> Result<Vec<OrderRecord>, LedgerError>;

    /// Update the status of the row at `row_index` (0-based, data rows only).
    async fn update_status(&self, row_index: usize, status: OrderStatus)
        -> Result<(), LedgerError>;
}
