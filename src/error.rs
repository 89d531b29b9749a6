use std::io;
use thiserror::Error;

/// Error type for inventory operations.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error.
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Item name was not a string.
    #[error("Item name must be a string. Received: {0}")]
    InvalidItem(String),

    /// Quantity was not a finite number.
    #[error("Quantity must be a number. Received: {0}")]
    InvalidQuantity(String),

    /// Item not present in the store.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// A data file entry did not hold a number.
    #[error("Invalid quantity {value} for item {item}")]
    InvalidEntry {
        /// The offending item name.
        item: String,
        /// The raw value found in the file.
        value: String,
    },
}

/// Result type alias for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;
