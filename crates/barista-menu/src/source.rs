//! Menu source abstraction.
//!
//! The source returns raw rows; all validation happens in
//! [`MenuSnapshot::from_rows`](crate::types::MenuSnapshot::from_rows).

use async_trait::async_trait;
use tracing::trace;

use crate::error::MenuError;
use crate::types::RawMenuRow;

/// A provider of raw menu rows. May be slow, may fail; callers cache.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetch the ordered sequence of raw price-list rows.
    async fn fetch_rows(&self) -> Result<Vec<RawMenuRow>, MenuError>;
}

/// HTTP menu source expecting a JSON array of rows.
pub struct HttpMenuSource {
    client: reqwest::Client,
    url: String,
}

impl HttpMenuSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn fetch_rows(&self) -> Result<Vec<RawMenuRow>, MenuError> {
        trace!(url = %self.url, "Fetching menu rows");
        let resp = self.client.get(&self.url).send().await?;
        let resp = resp.error_for_status()?;
        let rows: Vec<RawMenuRow> = resp
            .json()
            .await
            .map_err(|e| MenuError::Malformed(e.to_string()))?;
        Ok(rows)
    }
}

/// Fixed in-memory source, used for the built-in menu and in tests.
pub struct StaticMenuSource {
    rows: Vec<RawMenuRow>,
}

impl StaticMenuSource {
    pub fn new(rows: Vec<RawMenuRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl MenuSource for StaticMenuSource {
    async fn fetch_rows(&self) -> Result<Vec<RawMenuRow>, MenuError> {
        Ok(self.rows.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
