//! Route handler functions for all API endpoints.
//!
//! Each handler extracts parameters via axum extractors, delegates to the
//! engine/parser/ledger, and returns JSON responses.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use barista_core::types::{FinalizedOrder, OrderLineItem, OrderStatus, PendingItem};
use barista_menu::types::MenuSnapshot;
use barista_voice::synthesize_best_effort;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub message: String,
    pub customer_name: Option<String>,
    /// "text" (default) or "voice".
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub message: String,
    pub customer_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    pub reply: String,
    pub needs_more_info: bool,
    pub order_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_item: Option<PendingItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<FinalizedOrder>,
    /// Base64 audio of the reply; absent in text mode or when synthesis
    /// failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponseBody {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<FinalizedOrder>,
}

#[derive(Debug, Serialize)]
pub struct OrderHistoryEntry {
    /// Ordinal position in the ledger, used to address status updates.
    pub row_index: usize,
    pub timestamp: String,
    pub customer_name: String,
    pub items: Vec<OrderLineItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub order_number: u32,
}

#[derive(Debug, Serialize)]
pub struct OrderHistoryResponse {
    pub orders: Vec<OrderHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub active_sessions: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /chat: one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let outcome = state
        .engine
        .take_turn(&req.session_id, &req.message, req.customer_name.as_deref())
        .await?;

    // Voice is best-effort: a synthesis failure yields a silent response.
    let audio = match (req.mode.as_deref(), &state.voice) {
        (Some("voice"), Some(voice)) => {
            synthesize_best_effort(voice.as_ref(), &outcome.reply).await
        }
        _ => None,
    };

    Ok(Json(ChatResponseBody {
        reply: outcome.reply,
        needs_more_info: outcome.needs_more_info,
        order_complete: outcome.order_complete,
        pending_item: outcome.pending_item,
        order: outcome.order,
        audio,
    }))
}

/// POST /order: one-shot order submission.
pub async fn order(
    State(state): State<AppState>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderResponseBody>, ApiError> {
    let outcome = state
        .single_turn
        .submit(&req.message, req.customer_name.as_deref())
        .await?;

    Ok(Json(OrderResponseBody {
        response: outcome.response,
        order: outcome.order,
    }))
}

/// GET /orders: full order history from the ledger.
pub async fn orders(
    State(state): State<AppState>,
) -> Result<Json<OrderHistoryResponse>, ApiError> {
    let rows = state.ledger.read_all().await?;
    let orders = rows
        .into_iter()
        .enumerate()
        .map(|(row_index, r)| OrderHistoryEntry {
            row_index,
            timestamp: r.timestamp,
            customer_name: r.customer_name,
            items: r.items,
            total: r.total,
            status: r.status,
            order_number: r.order_number,
        })
        .collect();
    Ok(Json(OrderHistoryResponse { orders }))
}

/// POST /orders/{index}/status: update one order's status by row ordinal.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = match req.status.trim().to_lowercase().as_str() {
        "pending" => OrderStatus::Pending,
        "ready" => OrderStatus::Ready,
        "fulfilled" => OrderStatus::Fulfilled,
        other => {
            return Err(ApiError::BadRequest(format!(
                "Unknown status '{}'. Must be one of: pending, ready, fulfilled",
                other
            )))
        }
    };

    state.ledger.update_status(index, status).await?;
    tracing::info!(row_index = index, status = %status, "Order status updated");
    Ok(Json(serde_json::json!({"row_index": index, "status": status})))
}

/// GET /menu: the current menu snapshot.
pub async fn menu(State(state): State<AppState>) -> Json<MenuSnapshot> {
    Json(state.menu.get().await)
}

/// GET /health: liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        active_sessions: state.sessions.len(),
    })
}
