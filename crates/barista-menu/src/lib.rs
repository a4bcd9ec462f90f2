//! Menu handling for Barista.
//!
//! Owns the time-bounded cached view of the structured menu, the raw-row
//! parsing rules, and price resolution for (item, size) pairs.

pub mod cache;
pub mod error;
pub mod pricing;
pub mod source;
pub mod types;

pub use cache::MenuCache;
pub use error::MenuError;
pub use pricing::resolve_price;
pub use source::{HttpMenuSource, MenuSource, StaticMenuSource};
pub use types::{MenuEntry, MenuSnapshot, RawMenuRow};
