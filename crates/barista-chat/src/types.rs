//! Conversation state and the oracle's structured reply schemas.

use serde::{Deserialize, Serialize};

use barista_core::types::{DialogueTurn, FinalizedOrder, OrderLineItem, PendingItem};
use barista_oracle::{extract_json_object, OracleError};

// =============================================================================
// Session state
// =============================================================================

/// One customer's in-progress ordering dialogue.
///
/// Owned by the [`SessionStore`](crate::session::SessionStore); the engine
/// borrows it for the duration of a single turn under the session's lock.
#[derive(Clone, Debug, Default)]
pub struct ConversationSession {
    /// Completed, priced order lines in the order they were added.
    pub completed: Vec<OrderLineItem>,
    /// The item currently being clarified, if any.
    pub pending: Option<PendingItem>,
    /// Full dialogue history, oracle-call input.
    pub history: Vec<DialogueTurn>,
    /// Epoch seconds of the last turn, for idle expiry.
    pub last_activity: i64,
}

impl ConversationSession {
    pub fn new(now: i64) -> Self {
        Self {
            last_activity: now,
            ..Self::default()
        }
    }
}

// =============================================================================
// Oracle reply schema (conversational path)
// =============================================================================

/// Discrete next-action tag the oracle must emit with every reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleAction {
    AskSize,
    AskTemperature,
    AskMilk,
    AskModifications,
    AddItem,
    FinalizeOrder,
    InvalidRequest,
}

/// The oracle's structured interpretation of one conversation turn.
#[derive(Clone, Debug, Deserialize)]
pub struct OracleReply {
    /// Human-readable reply to speak or display.
    pub reply: String,
    #[serde(default)]
    pub needs_more_info: bool,
    #[serde(default)]
    pub order_complete: bool,
    /// Updated pending-item attributes. Full replacement: the oracle
    /// receives the prior pending item as input and returns the
    /// accumulated state.
    #[serde(default)]
    pub pending_item: Option<PendingItem>,
    pub action: OracleAction,
}

impl OracleReply {
    /// Parse raw oracle output, salvaging a JSON object embedded in
    /// surrounding noise if the direct parse fails.
    pub fn parse(raw: &str) -> Result<Self, OracleError> {
        parse_with_salvage(raw)
    }
}

// =============================================================================
// Single-turn reply schema
// =============================================================================

/// The oracle's structured output for the one-shot order path. Prices are
/// taken from the oracle as returned, not re-resolved.
#[derive(Clone, Debug, Deserialize)]
pub struct SingleTurnReply {
    pub response: String,
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
    #[serde(default)]
    pub total: f64,
}

impl SingleTurnReply {
    pub fn parse(raw: &str) -> Result<Self, OracleError> {
        parse_with_salvage(raw)
    }
}

fn parse_with_salvage<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, OracleError> {
    match serde_json::from_str(raw) {
        Ok(parsed) => Ok(parsed),
        Err(direct_err) => {
            let span = extract_json_object(raw)
                .ok_or_else(|| OracleError::Malformed(direct_err.to_string()))?;
            serde_json::from_str(span).map_err(|e| OracleError::Malformed(e.to_string()))
        }
    }
}

// =============================================================================
// Turn outcomes
// =============================================================================

/// What one conversation turn produced.
#[derive(Clone, Debug, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub needs_more_info: bool,
    pub order_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_item: Option<PendingItem>,
    /// Present only when this turn finalized and persisted the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<FinalizedOrder>,
}

/// What a one-shot submission produced.
#[derive(Clone, Debug, Serialize)]
pub struct SingleTurnOutcome {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<FinalizedOrder>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- OracleReply parsing ----

    #[test]
    fn test_parse_clean_reply() {
        let raw = r#"{
            "reply": "What size would you like?",
            "needs_more_info": true,
            "order_complete": false,
            "pending_item": {"item": "latte"},
            "action": "ask_size"
        }"#;
        let reply = OracleReply::parse(raw).unwrap();
        assert_eq!(reply.reply, "What size would you like?");
        assert!(reply.needs_more_info);
        assert!(!reply.order_complete);
        assert_eq!(reply.pending_item.unwrap().item, "latte");
        assert_eq!(reply.action, OracleAction::AskSize);
    }

    #[test]
    fn test_parse_salvages_noisy_reply() {
        let raw = "Sure! {\"reply\":\"ok\",\"action\":\"ask_size\"} thanks";
        let reply = OracleReply::parse(raw).unwrap();
        assert_eq!(reply.reply, "ok");
        assert_eq!(reply.action, OracleAction::AskSize);
        assert!(!reply.needs_more_info);
    }

    #[test]
    fn test_parse_missing_action_is_malformed() {
        let err = OracleReply::parse(r#"{"reply":"ok"}"#).unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let err = OracleReply::parse("I'd be happy to help!").unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn test_parse_all_action_tags() {
        for (tag, action) in [
            ("ask_size", OracleAction::AskSize),
            ("ask_temperature", OracleAction::AskTemperature),
            ("ask_milk", OracleAction::AskMilk),
            ("ask_modifications", OracleAction::AskModifications),
            ("add_item", OracleAction::AddItem),
            ("finalize_order", OracleAction::FinalizeOrder),
            ("invalid_request", OracleAction::InvalidRequest),
        ] {
            let raw = format!(r#"{{"reply":"r","action":"{}"}}"#, tag);
            assert_eq!(OracleReply::parse(&raw).unwrap().action, action);
        }
    }

    // ---- SingleTurnReply parsing ----

    #[test]
    fn test_parse_single_turn_reply() {
        let raw = r#"{
            "response": "One large latte, $4.50 total.",
            "items": [{"item": "latte", "size": "large", "price": 4.5}],
            "total": 4.5
        }"#;
        let reply = SingleTurnReply::parse(raw).unwrap();
        assert_eq!(reply.items.len(), 1);
        assert_eq!(reply.total, 4.5);
    }

    #[test]
    fn test_parse_single_turn_defaults() {
        let reply = SingleTurnReply::parse(r#"{"response":"We don't sell that."}"#).unwrap();
        assert!(reply.items.is_empty());
        assert_eq!(reply.total, 0.0);
    }

    // ---- Session ----

    #[test]
    fn test_new_session_is_empty() {
        let session = ConversationSession::new(1_000);
        assert!(session.completed.is_empty());
        assert!(session.pending.is_none());
        assert!(session.history.is_empty());
        assert_eq!(session.last_activity, 1_000);
    }

    // ---- Outcome serialization ----

    #[test]
    fn test_turn_outcome_omits_absent_order() {
        let outcome = TurnOutcome {
            reply: "what size?".to_string(),
            needs_more_info: true,
            order_complete: false,
            pending_item: None,
            order: None,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("\"order\""));
        assert!(!json.contains("pending_item"));
    }
}
