//! Time-bounded menu cache.
//!
//! Serves the cached snapshot while it is younger than the TTL; otherwise
//! refreshes from the source before returning. Refresh is unsynchronized:
//! concurrent callers past the TTL may both fetch, last writer wins. A
//! source failure serves the configured fallback instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::source::MenuSource;
use crate::types::MenuSnapshot;

struct Cached {
    snapshot: MenuSnapshot,
    fetched: Instant,
}

/// Shared, time-bounded view of the menu.
pub struct MenuCache {
    source: Arc<dyn MenuSource>,
    ttl: Duration,
    fallback: MenuSnapshot,
    cached: RwLock<Option<Cached>>,
}

impl MenuCache {
    /// Create a cache over `source` with the built-in fallback menu.
    pub fn new(source: Arc<dyn MenuSource>, ttl: Duration) -> Self {
        Self::with_fallback(source, ttl, MenuSnapshot::fallback())
    }

    /// Create a cache with an explicit fallback snapshot. An empty fallback
    /// is valid; callers must tolerate an empty menu in that configuration.
    pub fn with_fallback(
        source: Arc<dyn MenuSource>,
        ttl: Duration,
        fallback: MenuSnapshot,
    ) -> Self {
        Self {
            source,
            ttl,
            fallback,
            cached: RwLock::new(None),
        }
    }

    /// Current menu snapshot, refreshing from the source if the cached one
    /// is missing or older than the TTL.
    pub async fn get(&self) -> MenuSnapshot {
        {
            let cached = self.cached.read().await;
            if let Some(c) = cached.as_ref() {
                if c.fetched.elapsed() <= self.ttl {
                    return c.snapshot.clone();
                }
            }
        }
        self.refresh().await
    }

    /// Fetch from the source and replace the cached snapshot. On failure the
    /// fallback is returned and the stale cache entry is left in place so a
    /// later call retries the source.
    pub async fn refresh(&self) -> MenuSnapshot {
        match self.source.fetch_rows().await {
            Ok(rows) => {
                let snapshot = MenuSnapshot::from_rows(&rows, chrono::Utc::now().timestamp());
                debug!(items = snapshot.entries.len(), "Menu refreshed");
                let mut cached = self.cached.write().await;
                *cached = Some(Cached {
                    snapshot: snapshot.clone(),
                    fetched: Instant::now(),
                });
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "Menu fetch failed — serving fallback");
                self.fallback.clone()
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
