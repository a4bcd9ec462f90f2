//! Stateless one-shot order path.
//!
//! One utterance, one oracle call against the restricted items/total
//! schema. Prices come from the oracle's structured output as returned;
//! orders with no items or a zero total are relayed conversationally and
//! never persisted.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use barista_core::types::{DialogueTurn, FinalizedOrder, OrderStatus, ANONYMOUS_CUSTOMER};
use barista_ledger::{Ledger, OrderRecord};
use barista_menu::MenuCache;
use barista_oracle::Oracle;

use crate::error::ChatError;
use crate::finalize::allocate_order_number;
use crate::prompt;
use crate::types::{SingleTurnOutcome, SingleTurnReply};

/// Parses complete orders from a single message.
pub struct SingleTurnParser {
    oracle: Arc<dyn Oracle>,
    menu: Arc<MenuCache>,
    ledger: Arc<dyn Ledger>,
}

impl SingleTurnParser {
    pub fn new(oracle: Arc<dyn Oracle>, menu: Arc<MenuCache>, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            oracle,
            menu,
            ledger,
        }
    }

    /// Interpret `message` as a complete order and persist it if valid.
    pub async fn submit(
        &self,
        message: &str,
        customer_name: Option<&str>,
    ) -> Result<SingleTurnOutcome, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let menu = self.menu.get().await;
        let system = prompt::single_turn_prompt(&menu);
        let raw = self
            .oracle
            .complete(&system, &[DialogueTurn::customer(message)])
            .await?;
        let reply = SingleTurnReply::parse(&raw)?;

        if reply.items.is_empty() || reply.total <= 0.0 {
            return Ok(SingleTurnOutcome {
                response: reply.response,
                order: None,
            });
        }

        let customer_name = customer_name
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(ANONYMOUS_CUSTOMER)
            .to_string();

        let order = FinalizedOrder {
            timestamp: Utc::now().to_rfc3339(),
            customer_name,
            items: reply.items,
            total: reply.total,
            status: OrderStatus::Pending,
            order_number: allocate_order_number(),
        };

        self.ledger.append(&OrderRecord::from_order(&order)).await?;
        info!(
            order_number = order.order_number,
            total = order.total,
            "Single-turn order persisted"
        );

        Ok(SingleTurnOutcome {
            response: reply.response,
            order: Some(order),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
