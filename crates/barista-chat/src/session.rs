//! Conversation session store.
//!
//! Sessions are keyed by an opaque caller-supplied id and created lazily on
//! first reference. Each session lives behind its own async mutex so turns
//! for one session are serialized; the outer map lock is held only for
//! lookups and sweeps, never across an await point.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::types::ConversationSession;

/// Handle to one session's state, locked for the duration of a turn.
pub type SessionSlot = Arc<AsyncMutex<ConversationSession>>;

/// Owns all live conversation sessions and their idle expiry.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionSlot>>,
    idle_timeout_secs: i64,
}

impl SessionStore {
    pub fn new(idle_timeout_minutes: u32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout_secs: i64::from(idle_timeout_minutes) * 60,
        }
    }

    /// Fetch the slot for `id`, creating an empty session on first use.
    ///
    /// An expired-but-unswept session encountered here is discarded and
    /// recreated empty. Touches `last_activity` when the slot is idle; a
    /// slot currently locked by an in-flight turn is returned as-is.
    pub fn get_or_create(&self, id: &str) -> SessionSlot {
        let now = now();
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");

        if let Some(slot) = sessions.get(id).cloned() {
            match slot.try_lock() {
                Ok(mut session) => {
                    if now - session.last_activity > self.idle_timeout_secs {
                        debug!(session_id = %id, "Expired session replaced on access");
                        drop(session);
                        let fresh: SessionSlot =
                            Arc::new(AsyncMutex::new(ConversationSession::new(now)));
                        sessions.insert(id.to_string(), fresh.clone());
                        return fresh;
                    }
                    session.last_activity = now;
                }
                // Locked by an in-flight turn; certainly not idle.
                Err(_) => {}
            }
            return slot;
        }

        let slot: SessionSlot = Arc::new(AsyncMutex::new(ConversationSession::new(now)));
        sessions.insert(id.to_string(), slot.clone());
        slot
    }

    /// Remove a session outright (order finalized, or caller reset).
    pub fn remove(&self, id: &str) {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .remove(id);
    }

    /// Drop sessions idle past the threshold. Slots locked by an in-flight
    /// turn are skipped; they will be considered on the next sweep. Returns
    /// the number of sessions removed.
    pub fn sweep_expired(&self) -> usize {
        let now = now();
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(session) => now - session.last_activity <= self.idle_timeout_secs,
            Err(_) => true,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "Idle sessions swept");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session map lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions
            .lock()
            .expect("session map lock poisoned")
            .contains_key(id)
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

// =============================================================================
// Tests
// =============================================================================
