use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::{InventoryError, Quantity, Result};

/// Data file used when the caller does not name one.
pub const DEFAULT_PATH: &str = "inventory.json";

/// Threshold used by the CLI's `low` command when none is given.
pub const DEFAULT_LOW_STOCK_THRESHOLD: Quantity = Quantity::Int(5);

/// Indentation of the persisted JSON file.
const INDENT: &[u8] = b"    ";

/// Record of a single successful `add`.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// When the item was added.
    pub timestamp: DateTime<Local>,
    /// The item that was added to.
    pub item: String,
    /// The amount that was added.
    pub quantity: Quantity,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Added {} of {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.quantity,
            self.item
        )
    }
}

/// Effect of a mutation on a single item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    /// The item now holds this quantity.
    Updated(Quantity),
    /// The quantity dropped to zero or below and the item was deleted.
    Removed,
    /// Nothing happened (empty item name).
    Ignored,
}

/// What `try_load` found at the given path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was parsed; holds the number of items kept.
    Loaded(usize),
    /// No file exists at the path.
    Missing,
    /// The file exists but has no content.
    Empty,
}

/// An in-memory inventory mapping item names to stock quantities.
///
/// Items keep the order in which they were first added, which is also
/// the order used by reports, low-stock listings and the saved file.
/// Every stored quantity is strictly positive: a mutation that would
/// leave an item at zero or below deletes it instead.
///
/// The plain operations (`add`, `remove`, `load`, `save`) never fail;
/// they report problems through the `log` facade. Their `try_` variants
/// return the error instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryStore {
    items: IndexMap<String, Quantity>,
}

impl InventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store populated from the JSON file at `path`.
    ///
    /// Follows the same rules as [`InventoryStore::load`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        let mut store = Self::new();
        store.load(path);
        store
    }

    /// Number of items in stock.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no item is in stock.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if `item` is in stock.
    pub fn contains(&self, item: &str) -> bool {
        self.items.contains_key(item)
    }

    /// Iterates over items and their quantities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Quantity)> + '_ {
        self.items.iter().map(|(item, &qty)| (item.as_str(), qty))
    }

    /// Adds `quantity` units of `item`, logging an error on invalid input.
    ///
    /// An empty item name is silently ignored. On success a [`LogEntry`]
    /// is pushed onto `logs` when one is supplied.
    pub fn add(
        &mut self,
        item: &str,
        quantity: impl Into<Quantity>,
        logs: Option<&mut Vec<LogEntry>>,
    ) {
        if let Err(e) = self.try_add(item, quantity, logs) {
            error!("{}", e);
        }
    }

    /// Adds `quantity` units of `item`.
    ///
    /// Fails with `InvalidQuantity` if the quantity is NaN or infinite.
    pub fn try_add(
        &mut self,
        item: &str,
        quantity: impl Into<Quantity>,
        logs: Option<&mut Vec<LogEntry>>,
    ) -> Result<Change> {
        let quantity = finite(quantity.into())?;
        if item.is_empty() {
            return Ok(Change::Ignored);
        }

        let total = finite(self.get_quantity(item) + quantity)?;
        let change = if total.is_positive() {
            self.items.insert(item.to_owned(), total);
            Change::Updated(total)
        } else {
            self.items.shift_remove(item);
            Change::Removed
        };
        debug!("Added {} of {}", quantity, item);

        if let Some(logs) = logs {
            logs.push(LogEntry {
                timestamp: Local::now(),
                item: item.to_owned(),
                quantity,
            });
        }
        Ok(change)
    }

    /// Adds stock from untyped input, such as a decoded JSON request.
    ///
    /// A non-string item or a non-numeric quantity is logged and ignored.
    pub fn add_value(&mut self, item: &Value, quantity: &Value, logs: Option<&mut Vec<LogEntry>>) {
        let Some(name) = item.as_str() else {
            error!("{}", InventoryError::InvalidItem(item.to_string()));
            return;
        };
        match Quantity::from_value(quantity) {
            Some(quantity) => self.add(name, quantity, logs),
            None => error!("{}", InventoryError::InvalidQuantity(quantity.to_string())),
        }
    }

    /// Removes `quantity` units of `item`.
    ///
    /// Removing a missing item logs a warning; an invalid quantity logs an
    /// error. Neither changes the store.
    pub fn remove(&mut self, item: &str, quantity: impl Into<Quantity>) {
        match self.try_remove(item, quantity) {
            Ok(_) => {}
            Err(InventoryError::ItemNotFound(item)) => {
                warn!("Attempted to remove non-existent item: {}", item);
            }
            Err(e) => error!("Cannot remove {}: {}", item, e),
        }
    }

    /// Removes `quantity` units of `item`, deleting it once nothing is left.
    pub fn try_remove(&mut self, item: &str, quantity: impl Into<Quantity>) -> Result<Change> {
        let quantity = finite(quantity.into())?;
        let stock = self
            .items
            .get_mut(item)
            .ok_or_else(|| InventoryError::ItemNotFound(item.to_owned()))?;

        let remaining = finite(*stock - quantity)?;
        if remaining.is_positive() {
            *stock = remaining;
            return Ok(Change::Updated(remaining));
        }
        self.items.shift_remove(item);
        Ok(Change::Removed)
    }

    /// Removes stock using untyped input.
    pub fn remove_value(&mut self, item: &Value, quantity: &Value) {
        let Some(quantity) = Quantity::from_value(quantity) else {
            error!(
                "Cannot remove {}: {}",
                item,
                InventoryError::InvalidQuantity(quantity.to_string())
            );
            return;
        };
        match item.as_str() {
            Some(name) => self.remove(name, quantity),
            None => warn!("Attempted to remove non-existent item: {}", item),
        }
    }

    /// Returns the stock of `item`, or zero if it is not in the store.
    pub fn get_quantity(&self, item: &str) -> Quantity {
        self.items.get(item).copied().unwrap_or(Quantity::ZERO)
    }

    /// Iterates over the names of items whose stock is strictly below
    /// `threshold`, in insertion order.
    pub fn list_below(&self, threshold: impl Into<Quantity>) -> impl Iterator<Item = &str> + '_ {
        let threshold = threshold.into();
        self.iter()
            .filter(move |&(_, qty)| qty < threshold)
            .map(|(item, _)| item)
    }

    /// Replaces the contents of the store with the file at `path`.
    ///
    /// A missing or empty file leaves the store empty with a warning.
    /// Malformed content leaves it empty with an error.
    pub fn load(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(LoadOutcome::Loaded(count)) => {
                info!("Loaded {} items from '{}'", count, path.display());
            }
            Ok(LoadOutcome::Missing) => warn!(
                "Data file '{}' not found. Initializing empty inventory.",
                path.display()
            ),
            Ok(LoadOutcome::Empty) => warn!("Data file '{}' is empty.", path.display()),
            Err(InventoryError::Io(e)) => {
                error!("Could not read data file '{}': {}", path.display(), e)
            }
            Err(e) => error!(
                "Could not decode JSON from '{}': {}. Inventory may be corrupted.",
                path.display(),
                e
            ),
        }
    }

    /// Replaces the contents of the store with the file at `path`.
    ///
    /// The store is cleared before reading, so it is empty whenever this
    /// returns anything other than `Loaded`.
    pub fn try_load(&mut self, path: impl AsRef<Path>) -> Result<LoadOutcome> {
        let path = path.as_ref();
        self.items.clear();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
            Err(e) => return Err(e.into()),
        };
        let mut data = String::new();
        BufReader::new(file).read_to_string(&mut data)?;
        if data.is_empty() {
            return Ok(LoadOutcome::Empty);
        }

        self.items = parse_items(&data)?;
        Ok(LoadOutcome::Loaded(self.items.len()))
    }

    /// Writes the store to `path`, logging an error on failure.
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_save(path) {
            Ok(()) => info!("Saved {} items to '{}'", self.len(), path.display()),
            Err(e) => error!("Error saving data to '{}': {}", path.display(), e),
        }
    }

    /// Writes the store to `path` as pretty-printed JSON, replacing any
    /// existing file.
    pub fn try_save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        let mut serializer =
            Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
        self.items.serialize(&mut serializer)?;
        serializer.into_inner().flush()?;
        Ok(())
    }

    /// Returns a printable listing of every item and its quantity.
    pub fn report(&self) -> Report<'_> {
        Report(self)
    }

    /// Prints the item report to stdout.
    pub fn print_report(&self) {
        print!("{}", self.report());
    }
}

/// Human-readable listing of an [`InventoryStore`].
pub struct Report<'a>(&'a InventoryStore);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items Report")?;
        for (item, qty) in self.0.iter() {
            writeln!(f, "{} -> {}", item, qty)?;
        }
        Ok(())
    }
}

fn finite(quantity: Quantity) -> Result<Quantity> {
    if quantity.is_finite() {
        Ok(quantity)
    } else {
        Err(InventoryError::InvalidQuantity(quantity.to_string()))
    }
}

/// Parses a data file, checking every value since the file is untyped.
fn parse_items(data: &str) -> Result<IndexMap<String, Quantity>> {
    let raw: IndexMap<String, Value> = serde_json::from_str(data)?;
    let mut items = IndexMap::with_capacity(raw.len());
    for (item, value) in raw {
        let qty = Quantity::from_value(&value).ok_or_else(|| InventoryError::InvalidEntry {
            item: item.clone(),
            value: value.to_string(),
        })?;
        if qty.is_positive() {
            items.insert(item, qty);
        } else {
            warn!("Dropping item {} with non-positive quantity {}", item, qty);
        }
    }
    Ok(items)
}
