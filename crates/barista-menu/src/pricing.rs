//! Price resolution for (item, size) pairs.

use crate::types::{normalize, MenuEntry, MenuSnapshot};

/// Resolve the price of `item` (optionally in `size`) against a snapshot.
///
/// Inputs are normalized before lookup. A flat entry prices regardless of
/// any supplied size; a sized entry requires a matching size key. `None`
/// means "unpriced": callers substitute 0 and surface the gap
/// conversationally rather than failing the request.
pub fn resolve_price(menu: &MenuSnapshot, item: &str, size: Option<&str>) -> Option<f64> {
    let entry = menu.entries.get(&normalize(item))?;
    match entry {
        MenuEntry::Flat(price) => Some(*price),
        MenuEntry::Sized(sizes) => {
            let size = normalize(size?);
            sizes.get(&size).copied()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
