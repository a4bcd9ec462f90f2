//! Ledger row codec.
//!
//! A row is a JSON array `[timestamp, customer_name, items-JSON, total,
//! status, order_number]`; the items field is itself a JSON-encoded string,
//! matching the flat cell model of spreadsheet-style ledgers.

use serde_json::Value;

use barista_core::types::{FinalizedOrder, OrderLineItem, OrderStatus};

use crate::error::LedgerError;

/// One persisted order row.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderRecord {
    pub timestamp: String,
    pub customer_name: String,
    pub items: Vec<OrderLineItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub order_number: u32,
}

/// Header row written as the first line of a fresh ledger.
pub const HEADER: [&str; 6] = [
    "timestamp",
    "customer_name",
    "items",
    "total",
    "status",
    "order_number",
];

impl OrderRecord {
    pub fn from_order(order: &FinalizedOrder) -> Self {
        Self {
            timestamp: order.timestamp.clone(),
            customer_name: order.customer_name.clone(),
            items: order.items.clone(),
            total: order.total,
            status: order.status,
            order_number: order.order_number,
        }
    }

    /// Encode as the wire row.
    pub fn to_row(&self) -> Result<Value, LedgerError> {
        let items = serde_json::to_string(&self.items)?;
        Ok(Value::Array(vec![
            Value::from(self.timestamp.clone()),
            Value::from(self.customer_name.clone()),
            Value::from(items),
            Value::from(self.total),
            Value::from(self.status.as_str()),
            Value::from(self.order_number),
        ]))
    }

    /// Decode a wire row.
    pub fn from_row(row: &Value) -> Result<Self, LedgerError> {
        let cells = row
            .as_array()
            .ok_or_else(|| LedgerError::Malformed("row is not an array".to_string()))?;
        if cells.len() != 6 {
            return Err(LedgerError::Malformed(format!(
                "expected 6 cells, got {}",
                cells.len()
            )));
        }

        let cell_str = |idx: usize| -> Result<&str, LedgerError> {
            cells[idx]
                .as_str()
                .ok_or_else(|| LedgerError::Malformed(format!("cell {} is not a string", idx)))
        };

        let items: Vec<OrderLineItem> = serde_json::from_str(cell_str(2)?)?;
        let total = cells[3]
            .as_f64()
            .ok_or_else(|| LedgerError::Malformed("total is not a number".to_string()))?;
        let order_number = cells[5]
            .as_u64()
            .ok_or_else(|| LedgerError::Malformed("order_number is not an integer".to_string()))?
            as u32;

        Ok(Self {
            timestamp: cell_str(0)?.to_string(),
            customer_name: cell_str(1)?.to_string(),
            items,
            total,
            status: OrderStatus::parse(cell_str(4)?),
            order_number,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
