use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Who produced a dialogue turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The customer at the counter (typed or transcribed speech).
    Customer,
    /// The ordering assistant.
    Assistant,
}

/// Lifecycle state of a finalized order in the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted, not yet prepared (initial state).
    #[default]
    Pending,
    /// Prepared and waiting for pickup.
    Ready,
    /// Handed to the customer.
    Fulfilled,
}

impl OrderStatus {
    /// Parse a ledger status string. Unknown strings map to `Pending`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ready" => OrderStatus::Ready,
            "fulfilled" => OrderStatus::Fulfilled,
            _ => OrderStatus::Pending,
        }
    }

    /// The lowercase ledger representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ready => "ready",
            OrderStatus::Fulfilled => "fulfilled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Dialogue
// =============================================================================

/// One turn of the ordering dialogue, oracle-call input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueTurn {
    pub fn customer(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Customer,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

// =============================================================================
// Order lines
// =============================================================================

/// An order line under construction: named item plus whichever attributes
/// the dialogue has resolved so far. Not yet priced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingItem {
    /// Item name as the customer phrased it (normalized at pricing time).
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milk: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<String>,
}

impl PendingItem {
    pub fn named(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            ..Self::default()
        }
    }
}

/// A completed, priced order line. Immutable once appended to a session's
/// completed list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milk: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<String>,
    /// Resolved price; 0.0 when the menu could not price the line.
    #[serde(default)]
    pub price: f64,
}

impl OrderLineItem {
    /// Promote a pending item with its resolved price.
    pub fn from_pending(pending: PendingItem, price: f64) -> Self {
        Self {
            item: pending.item,
            size: pending.size,
            temperature: pending.temperature,
            milk: pending.milk,
            modifications: pending.modifications,
            price,
        }
    }
}

// =============================================================================
// Finalized orders
// =============================================================================

/// Placeholder display name for orders submitted without a customer name.
pub const ANONYMOUS_CUSTOMER: &str = "guest";

/// A completed order as persisted to the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalizedOrder {
    /// RFC 3339 timestamp of finalization.
    pub timestamp: String,
    pub customer_name: String,
    pub items: Vec<OrderLineItem>,
    /// Sum of line prices; 0-priced lines contribute 0.
    pub total: f64,
    pub status: OrderStatus,
    /// Pickup number in [100, 999]; uniqueness is not enforced.
    pub order_number: u32,
}

impl FinalizedOrder {
    /// Sum the line prices of a completed-items list.
    pub fn total_of(items: &[OrderLineItem]) -> f64 {
        items.iter().map(|i| i.price).sum()
    }
}

// =============================================================================
// Tests
// =============================================================================
