//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use barista_chat::{OrderEngine, SessionStore, SingleTurnParser};
use barista_ledger::Ledger;
use barista_menu::MenuCache;
use barista_voice::SpeechSynthesizer;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks; interior
/// mutability lives inside the components themselves.
#[derive(Clone)]
pub struct AppState {
    /// The conversational order-construction engine.
    pub engine: Arc<OrderEngine>,
    /// The stateless one-shot order path.
    pub single_turn: Arc<SingleTurnParser>,
    /// Shared menu view.
    pub menu: Arc<MenuCache>,
    /// Finalized-order store.
    pub ledger: Arc<dyn Ledger>,
    /// Live conversation sessions (for the background sweeper).
    pub sessions: Arc<SessionStore>,
    /// Optional speech synthesis; `None` disables voice replies entirely.
    pub voice: Option<Arc<dyn SpeechSynthesizer>>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        engine: Arc<OrderEngine>,
        single_turn: Arc<SingleTurnParser>,
        menu: Arc<MenuCache>,
        ledger: Arc<dyn Ledger>,
        sessions: Arc<SessionStore>,
        voice: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> Self {
        Self {
            engine,
            single_turn,
            menu,
            ledger,
            sessions,
            voice,
            start_time: Instant::now(),
        }
    }
}
