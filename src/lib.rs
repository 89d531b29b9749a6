#![deny(missing_docs)]

//! A small inventory tracker persisted as a JSON file.
//!
//! The [`InventoryStore`] keeps item-to-quantity counts in memory, in the
//! order items were first added, and reads or writes them as a single
//! pretty-printed JSON object. Operations report problems through the
//! `log` facade instead of failing; `try_` variants expose the errors.

mod error;
mod quantity;
mod store;

pub use error::{InventoryError, Result};
pub use quantity::Quantity;
pub use store::{
    Change, InventoryStore, LoadOutcome, LogEntry, Report, DEFAULT_LOW_STOCK_THRESHOLD,
    DEFAULT_PATH,
};
