//! Router setup with all API routes and middleware.

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/menu", get(handlers::menu))
        .route("/chat", post(handlers::chat))
        .route("/order", post(handlers::order))
        .route("/orders", get(handlers::orders))
        .route("/orders/{index}/status", post(handlers::update_order_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Tests
// =============================================================================
