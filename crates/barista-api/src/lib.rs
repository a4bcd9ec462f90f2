//! HTTP surface for the Barista service.
//!
//! Thin adapters over the conversation engine, the single-turn parser, the
//! menu cache, and the ledger. All domain behavior lives below this crate.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
