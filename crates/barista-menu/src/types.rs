//! Menu data model and raw-row parsing rules.
//!
//! A source row becomes part of the menu only if it has a nonempty item name
//! and a parseable positive price. Rows without a size produce flat entries;
//! rows with a size produce or extend a sized entry. When an item appears
//! with both shapes, sized rows win.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One raw row from the menu source, prior to validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawMenuRow {
    pub item: String,
    #[serde(default)]
    pub size: Option<String>,
    /// Price as the source formats it, possibly "$"-prefixed.
    pub price: String,
}

/// A purchasable menu entry keyed by normalized item name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuEntry {
    /// A single price with no size dimension.
    Flat(f64),
    /// Normalized size label to price.
    Sized(BTreeMap<String, f64>),
}

/// Immutable view of the menu at a point in time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    /// Normalized item name to entry.
    pub entries: BTreeMap<String, MenuEntry>,
    /// Epoch seconds at which the source was fetched (0 for built-ins).
    pub fetched_at: i64,
}

/// Lowercase-trim a menu key (item name or size label).
pub fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Parse a source price string, tolerating a leading `$` and surrounding
/// whitespace. Returns `None` for unparseable, zero, negative, or non-finite
/// values; such rows are non-purchasable and excluded from the menu.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('$').trim();
    let price: f64 = cleaned.parse().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}

impl MenuSnapshot {
    /// Build a snapshot from raw source rows, applying the parsing rules.
    pub fn from_rows(rows: &[RawMenuRow], fetched_at: i64) -> Self {
        let mut entries: BTreeMap<String, MenuEntry> = BTreeMap::new();

        for row in rows {
            let item = normalize(&row.item);
            if item.is_empty() {
                continue;
            }
            let Some(price) = parse_price(&row.price) else {
                continue;
            };

            let size = row
                .size
                .as_deref()
                .map(normalize)
                .filter(|s| !s.is_empty());

            let updated = match (entries.remove(&item), size) {
                (Some(MenuEntry::Sized(mut sizes)), Some(size)) => {
                    sizes.insert(size, price);
                    MenuEntry::Sized(sizes)
                }
                (Some(MenuEntry::Sized(sizes)), None) => {
                    // Sized wins over flat for the same item.
                    debug!(item = %item, "Ignoring flat row for sized menu item");
                    MenuEntry::Sized(sizes)
                }
                (Some(MenuEntry::Flat(_)), Some(size)) | (None, Some(size)) => {
                    // A sized row converts the entry, discarding any flat price.
                    let mut sizes = BTreeMap::new();
                    sizes.insert(size, price);
                    MenuEntry::Sized(sizes)
                }
                // Later flat row wins.
                (Some(MenuEntry::Flat(_)), None) | (None, None) => MenuEntry::Flat(price),
            };
            entries.insert(item, updated);
        }

        Self {
            entries,
            fetched_at,
        }
    }

    /// Raw rows of the hardcoded menu, also usable to seed a static source.
    pub fn fallback_rows() -> Vec<RawMenuRow> {
        let rows = [
            ("latte", Some("small"), "3.50"),
            ("latte", Some("medium"), "4.00"),
            ("latte", Some("large"), "4.50"),
            ("cappuccino", Some("small"), "3.50"),
            ("cappuccino", Some("large"), "4.25"),
            ("drip coffee", None, "2.50"),
            ("cold brew", None, "4.00"),
            ("espresso", None, "3.00"),
            ("croissant", None, "3.25"),
            ("blueberry muffin", None, "3.00"),
        ];
        rows.into_iter()
            .map(|(item, size, price)| RawMenuRow {
                item: item.to_string(),
                size: size.map(String::from),
                price: price.to_string(),
            })
            .collect()
    }

    /// The hardcoded menu served when the source is unreachable.
    pub fn fallback() -> Self {
        Self::from_rows(&Self::fallback_rows(), 0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
