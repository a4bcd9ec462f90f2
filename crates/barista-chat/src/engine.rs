//! The order-construction engine: one conversation turn at a time.
//!
//! The engine owns the turn algorithm only: state bookkeeping, pricing,
//! and the finalization handoff. Conversational judgment (which attribute
//! to ask for next, what is valid for which item) belongs to the oracle.

use std::sync::Arc;

use tracing::{debug, warn};

use barista_core::types::{DialogueTurn, FinalizedOrder, OrderLineItem};
use barista_ledger::Ledger;
use barista_menu::{resolve_price, MenuCache};
use barista_oracle::Oracle;

use crate::error::ChatError;
use crate::finalize;
use crate::prompt;
use crate::session::SessionStore;
use crate::types::{OracleAction, OracleReply, TurnOutcome};

/// Drives the per-session order state machine.
pub struct OrderEngine {
    oracle: Arc<dyn Oracle>,
    menu: Arc<MenuCache>,
    sessions: Arc<SessionStore>,
    ledger: Arc<dyn Ledger>,
}

impl OrderEngine {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        menu: Arc<MenuCache>,
        sessions: Arc<SessionStore>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            oracle,
            menu,
            sessions,
            ledger,
        }
    }

    /// Process one inbound utterance for `session_id`.
    ///
    /// The turn runs under the session's lock, so overlapping requests for
    /// one session are serialized rather than racing on state. Session
    /// state is only mutated after the oracle's reply parses: an oracle or
    /// parse failure leaves the session exactly as it was.
    pub async fn take_turn(
        &self,
        session_id: &str,
        utterance: &str,
        customer_name: Option<&str>,
    ) -> Result<TurnOutcome, ChatError> {
        // Validate before any state access.
        if session_id.trim().is_empty() {
            return Err(ChatError::MissingSessionId);
        }
        if utterance.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let slot = self.sessions.get_or_create(session_id);
        let mut session = slot.lock().await;
        session.last_activity = chrono::Utc::now().timestamp();

        // Stage the user turn; committed only if the oracle reply parses.
        let mut history = session.history.clone();
        history.push(DialogueTurn::customer(utterance));

        let menu = self.menu.get().await;
        let system = prompt::conversation_prompt(&menu, &session.completed, session.pending.as_ref());

        let raw = self.oracle.complete(&system, &history).await?;
        let reply = OracleReply::parse(&raw).map_err(|e| {
            warn!(session_id = %session_id, error = %e, "Discarding unusable oracle reply");
            e
        })?;

        // Commit the turn.
        session.history = history;
        if let Some(pending) = reply.pending_item.clone() {
            // Full replace: the oracle returns the accumulated attributes.
            session.pending = Some(pending);
        }

        if reply.action == OracleAction::AddItem {
            if let Some(pending) = session.pending.take() {
                let price =
                    resolve_price(&menu, &pending.item, pending.size.as_deref()).unwrap_or(0.0);
                if price == 0.0 {
                    debug!(item = %pending.item, "Line added unpriced");
                }
                session
                    .completed
                    .push(OrderLineItem::from_pending(pending, price));
            } else {
                debug!(session_id = %session_id, "add_item with no pending item — ignored");
            }
        }
        session.history.push(DialogueTurn::assistant(reply.reply.clone()));

        let wants_finalize =
            reply.order_complete || reply.action == OracleAction::FinalizeOrder;
        if wants_finalize && !session.completed.is_empty() {
            let items = session.completed.clone();
            let total = FinalizedOrder::total_of(&items);

            if total > 0.0 {
                // Ledger failure propagates with the session intact for retry.
                let order =
                    finalize::finalize(self.ledger.as_ref(), customer_name, items).await?;
                drop(session);
                self.sessions.remove(session_id);
                return Ok(TurnOutcome {
                    reply: reply.reply,
                    needs_more_info: false,
                    order_complete: true,
                    pending_item: None,
                    order: Some(order),
                });
            }

            // Nothing priced: never persisted, only relayed conversationally.
            warn!(session_id = %session_id, "Order completed with zero total — not persisted");
            drop(session);
            self.sessions.remove(session_id);
            return Ok(TurnOutcome {
                reply: reply.reply,
                needs_more_info: false,
                order_complete: true,
                pending_item: None,
                order: None,
            });
        }

        Ok(TurnOutcome {
            reply: reply.reply,
            needs_more_info: reply.needs_more_info,
            order_complete: false,
            pending_item: session.pending.clone(),
            order: None,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use barista_core::types::PendingItem;
    use barista_ledger::MemoryLedger;
    use barista_menu::types::RawMenuRow;
    use barista_menu::StaticMenuSource;
    use barista_oracle::ScriptedOracle;

    fn menu_rows() -> Vec<RawMenuRow> {
        vec![
            RawMenuRow {
                item: "Latte".to_string(),
                size: Some("Small".to_string()),
                price: "$3.50".to_string(),
            },
            RawMenuRow {
                item: "Latte".to_string(),
                size: Some("Large".to_string()),
                price: "$4.50".to_string(),
            },
            RawMenuRow {
                item: "Drip Coffee".to_string(),
                size: None,
                price: "2.50".to_string(),
            },
        ]
    }

    struct Fixture {
        engine: OrderEngine,
        oracle: Arc<ScriptedOracle>,
        sessions: Arc<SessionStore>,
        ledger: Arc<MemoryLedger>,
    }

    fn fixture(replies: &[&str]) -> Fixture {
        let oracle = Arc::new(ScriptedOracle::new(replies.iter().copied()));
        let menu = Arc::new(MenuCache::new(
            Arc::new(StaticMenuSource::new(menu_rows())),
            Duration::from_secs(600),
        ));
        let sessions = Arc::new(SessionStore::new(30));
        let ledger = Arc::new(MemoryLedger::new());
        let engine = OrderEngine::new(
            oracle.clone(),
            menu,
            sessions.clone(),
            ledger.clone(),
        );
        Fixture {
            engine,
            oracle,
            sessions,
            ledger,
        }
    }

    // ---- Input validation ----

    #[tokio::test]
    async fn test_missing_session_id_rejected_before_state_access() {
        let f = fixture(&[]);
        let err = f.engine.take_turn("  ", "a latte", None).await.unwrap_err();
        assert!(matches!(err, ChatError::MissingSessionId));
        assert!(f.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_utterance_rejected_before_state_access() {
        let f = fixture(&[]);
        let err = f.engine.take_turn("s1", "", None).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
        assert!(f.sessions.is_empty());
    }

    // ---- Clarification turn ----

    #[tokio::test]
    async fn test_clarifying_turn_sets_pending_item() {
        let f = fixture(&[r#"{
            "reply": "What size latte?",
            "needs_more_info": true,
            "order_complete": false,
            "pending_item": {"item": "latte"},
            "action": "ask_size"
        }"#]);

        let outcome = f.engine.take_turn("s1", "I want a latte", None).await.unwrap();
        assert_eq!(outcome.reply, "What size latte?");
        assert!(outcome.needs_more_info);
        assert!(!outcome.order_complete);
        assert_eq!(outcome.pending_item.unwrap().item, "latte");
        assert!(outcome.order.is_none());
        assert!(f.ledger.is_empty());

        // History holds the customer turn and the assistant turn.
        let slot = f.sessions.get_or_create("s1");
        let session = slot.lock().await;
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].text, "I want a latte");
        assert_eq!(session.history[1].text, "What size latte?");
    }

    // ---- add_item transition ----

    #[tokio::test]
    async fn test_add_item_prices_and_clears_pending() {
        let f = fixture(&[r#"{
            "reply": "Added. Anything else?",
            "needs_more_info": false,
            "order_complete": false,
            "pending_item": {"item": "latte", "size": "large"},
            "action": "add_item"
        }"#]);

        // Seed the session with a pending latte, as after a prior turn.
        {
            let slot = f.sessions.get_or_create("s1");
            slot.lock().await.pending = Some(PendingItem::named("latte"));
        }

        let outcome = f.engine.take_turn("s1", "large please", None).await.unwrap();
        assert!(outcome.pending_item.is_none());

        let slot = f.sessions.get_or_create("s1");
        let session = slot.lock().await;
        assert_eq!(session.completed.len(), 1);
        assert_eq!(session.completed[0].price, 4.5);
        assert!(session.pending.is_none());
    }

    #[tokio::test]
    async fn test_add_item_with_unknown_size_prices_zero() {
        let f = fixture(&[r#"{
            "reply": "Added.",
            "pending_item": {"item": "latte", "size": "venti"},
            "action": "add_item"
        }"#]);

        f.engine.take_turn("s1", "venti latte", None).await.unwrap();

        let slot = f.sessions.get_or_create("s1");
        let session = slot.lock().await;
        assert_eq!(session.completed[0].price, 0.0);
    }

    #[tokio::test]
    async fn test_add_item_flat_entry_ignores_size() {
        let f = fixture(&[r#"{
            "reply": "Added.",
            "pending_item": {"item": "drip coffee", "size": "large"},
            "action": "add_item"
        }"#]);

        f.engine.take_turn("s1", "large drip", None).await.unwrap();

        let slot = f.sessions.get_or_create("s1");
        let session = slot.lock().await;
        assert_eq!(session.completed[0].price, 2.5);
    }

    #[tokio::test]
    async fn test_add_item_without_pending_is_ignored() {
        let f = fixture(&[r#"{"reply": "Hmm.", "action": "add_item"}"#]);

        let outcome = f.engine.take_turn("s1", "add it", None).await.unwrap();
        assert!(!outcome.order_complete);

        let slot = f.sessions.get_or_create("s1");
        assert!(slot.lock().await.completed.is_empty());
    }

    // ---- Pending replacement is full, not merged ----

    #[tokio::test]
    async fn test_pending_item_is_fully_replaced() {
        let f = fixture(&[r#"{
            "reply": "Oat milk it is.",
            "needs_more_info": true,
            "pending_item": {"item": "latte", "size": "large", "milk": "oat"},
            "action": "ask_temperature"
        }"#]);

        {
            let slot = f.sessions.get_or_create("s1");
            slot.lock().await.pending = Some(PendingItem {
                item: "latte".to_string(),
                size: Some("small".to_string()),
                temperature: Some("hot".to_string()),
                ..PendingItem::default()
            });
        }

        f.engine.take_turn("s1", "make it large with oat", None).await.unwrap();

        let slot = f.sessions.get_or_create("s1");
        let session = slot.lock().await;
        let pending = session.pending.as_ref().unwrap();
        assert_eq!(pending.size.as_deref(), Some("large"));
        assert_eq!(pending.milk.as_deref(), Some("oat"));
        // The oracle's reply did not carry temperature, so the replace drops it.
        assert!(pending.temperature.is_none());
    }

    // ---- Malformed oracle output ----

    #[tokio::test]
    async fn test_noisy_oracle_reply_is_salvaged() {
        let f = fixture(&["Sure! {\"reply\":\"ok\",\"action\":\"ask_size\"} thanks"]);
        let outcome = f.engine.take_turn("s1", "latte", None).await.unwrap();
        assert_eq!(outcome.reply, "ok");
    }

    #[tokio::test]
    async fn test_unusable_oracle_reply_leaves_session_unmodified() {
        let f = fixture(&["I would be happy to help with that!"]);

        {
            let slot = f.sessions.get_or_create("s1");
            let mut session = slot.lock().await;
            session.pending = Some(PendingItem::named("latte"));
            session.history.push(DialogueTurn::customer("a latte"));
        }

        let err = f.engine.take_turn("s1", "large", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Oracle(_)));

        let slot = f.sessions.get_or_create("s1");
        let session = slot.lock().await;
        // No half-committed turn: history and pending are exactly as seeded.
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.pending.as_ref().unwrap().item, "latte");
        assert!(session.completed.is_empty());
    }

    #[tokio::test]
    async fn test_oracle_transport_failure_leaves_session_unmodified() {
        let f = fixture(&[]); // exhausted oracle errors on first call

        let err = f.engine.take_turn("s1", "a latte", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Oracle(_)));

        let slot = f.sessions.get_or_create("s1");
        assert!(slot.lock().await.history.is_empty());
    }

    // ---- Finalization ----

    #[tokio::test]
    async fn test_zero_items_never_persisted_even_if_complete() {
        let f = fixture(&[r#"{
            "reply": "Nothing ordered, see you next time!",
            "order_complete": true,
            "action": "finalize_order"
        }"#]);

        let outcome = f.engine.take_turn("s1", "never mind", None).await.unwrap();
        assert!(!outcome.order_complete);
        assert!(outcome.order.is_none());
        assert!(f.ledger.is_empty());
    }

    #[tokio::test]
    async fn test_zero_total_completes_without_persisting() {
        let f = fixture(&[r#"{
            "reply": "All set!",
            "order_complete": true,
            "action": "finalize_order"
        }"#]);

        {
            let slot = f.sessions.get_or_create("s1");
            slot.lock().await.completed.push(OrderLineItem::from_pending(
                PendingItem::named("mystery"),
                0.0,
            ));
        }

        let outcome = f.engine.take_turn("s1", "that's it", None).await.unwrap();
        assert!(outcome.order_complete);
        assert!(outcome.order.is_none());
        assert!(f.ledger.is_empty());
        assert!(!f.sessions.contains("s1"));
    }

    #[tokio::test]
    async fn test_ledger_failure_fails_turn_and_keeps_session() {
        let f = fixture(&[r#"{
            "reply": "Done!",
            "order_complete": true,
            "action": "finalize_order"
        }"#]);
        f.ledger.set_fail_writes(true);

        {
            let slot = f.sessions.get_or_create("s1");
            slot.lock().await.completed.push(OrderLineItem::from_pending(
                PendingItem::named("latte"),
                4.5,
            ));
        }

        let err = f.engine.take_turn("s1", "that's it", None).await.unwrap_err();
        assert!(matches!(err, ChatError::Ledger(_)));
        // Session survives for a retry.
        assert!(f.sessions.contains("s1"));
        let slot = f.sessions.get_or_create("s1");
        assert_eq!(slot.lock().await.completed.len(), 1);

        // Retry succeeds once the ledger recovers.
        f.ledger.set_fail_writes(false);
        f.oracle.push(
            r#"{"reply": "Done!", "order_complete": true, "action": "finalize_order"}"#,
        );
        let outcome = f.engine.take_turn("s1", "that's it", None).await.unwrap();
        assert!(outcome.order.is_some());
        assert_eq!(f.ledger.len(), 1);
    }

    // ---- End-to-end scenario ----

    #[tokio::test]
    async fn test_three_turn_latte_order() {
        let f = fixture(&[
            r#"{
                "reply": "What size would you like?",
                "needs_more_info": true,
                "order_complete": false,
                "pending_item": {"item": "latte"},
                "action": "ask_size"
            }"#,
            r#"{
                "reply": "One large hot oat-milk latte. Anything else?",
                "needs_more_info": false,
                "order_complete": false,
                "pending_item": {"item": "latte", "size": "large", "temperature": "hot", "milk": "oat"},
                "action": "add_item"
            }"#,
            r#"{
                "reply": "Your order is in!",
                "needs_more_info": false,
                "order_complete": true,
                "action": "finalize_order"
            }"#,
        ]);

        // Turn 1: pending item, no ledger write.
        let t1 = f.engine.take_turn("s1", "I want a latte", Some("Ada")).await.unwrap();
        assert!(t1.needs_more_info);
        assert_eq!(t1.pending_item.as_ref().unwrap().item, "latte");
        assert!(f.ledger.is_empty());

        // Turn 2: item completed and priced from the sized menu.
        let t2 = f
            .engine
            .take_turn("s1", "large, hot, oat milk", Some("Ada"))
            .await
            .unwrap();
        assert!(t2.pending_item.is_none());
        assert!(t2.order.is_none());

        // Turn 3: finalized, persisted, session removed.
        let t3 = f.engine.take_turn("s1", "that's it", Some("Ada")).await.unwrap();
        assert!(t3.order_complete);
        let order = t3.order.unwrap();
        assert_eq!(order.customer_name, "Ada");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, 4.5);
        assert!((order.total - 4.5).abs() < f64::EPSILON);
        assert!((100..=999).contains(&order.order_number));

        let rows = f.ledger.read_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].total - 4.5).abs() < f64::EPSILON);
        assert!(!f.sessions.contains("s1"));
    }

    // ---- Invalid request ----

    #[tokio::test]
    async fn test_invalid_request_passes_reply_through() {
        let f = fixture(&[r#"{
            "reply": "We don't serve milkshakes, sorry.",
            "needs_more_info": false,
            "order_complete": false,
            "action": "invalid_request"
        }"#]);

        let outcome = f.engine.take_turn("s1", "a milkshake", None).await.unwrap();
        assert_eq!(outcome.reply, "We don't serve milkshakes, sorry.");
        assert!(outcome.pending_item.is_none());
        assert!(f.ledger.is_empty());
    }
}
