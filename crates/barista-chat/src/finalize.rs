//! Order finalization: total, order number, ledger persistence.

use chrono::Utc;
use rand::Rng;
use tracing::info;

use barista_core::types::{FinalizedOrder, OrderLineItem, OrderStatus, ANONYMOUS_CUSTOMER};
use barista_ledger::{Ledger, OrderRecord};

use crate::error::ChatError;

/// Pickup number in [100, 999]. Uniqueness against previously issued
/// numbers is not enforced; the ledger addresses rows by ordinal.
pub fn allocate_order_number() -> u32 {
    rand::rng().random_range(100..=999)
}

/// Build and persist a finalized order.
///
/// The caller guarantees `items` is nonempty and carries a nonzero total;
/// a ledger failure fails the whole operation so the caller can retry with
/// its session intact.
pub async fn finalize(
    ledger: &dyn Ledger,
    customer_name: Option<&str>,
    items: Vec<OrderLineItem>,
) -> Result<FinalizedOrder, ChatError> {
    let customer_name = customer_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ANONYMOUS_CUSTOMER)
        .to_string();

    let total = FinalizedOrder::total_of(&items);
    let order = FinalizedOrder {
        timestamp: Utc::now().to_rfc3339(),
        customer_name,
        items,
        total,
        status: OrderStatus::Pending,
        order_number: allocate_order_number(),
    };

    ledger.append(&OrderRecord::from_order(&order)).await?;
    info!(
        order_number = order.order_number,
        total = order.total,
        lines = order.items.len(),
        "Order persisted"
    );
    Ok(order)
}

// =============================================================================
// Tests
// =============================================================================
