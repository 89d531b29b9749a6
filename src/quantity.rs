use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{InventoryError, Result};

/// Stock count of a single item.
///
/// Integer arithmetic stays integral; anything that touches a float
/// becomes a float. The variant survives a save/load round trip, so a
/// file written with `7` reads back as `Int(7)` and `7.0` as `Float(7.0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Whole number of units.
    Int(i64),
    /// Fractional amount, e.g. kilograms.
    Float(f64),
}

impl Quantity {
    /// The quantity of an item that is not in the store.
    pub const ZERO: Quantity = Quantity::Int(0);

    /// Returns `true` unless this is a NaN or infinite float.
    pub fn is_finite(self) -> bool {
        match self {
            Quantity::Int(_) => true,
            Quantity::Float(f) => f.is_finite(),
        }
    }

    /// Returns `true` if strictly greater than zero.
    pub fn is_positive(self) -> bool {
        match self {
            Quantity::Int(n) => n > 0,
            Quantity::Float(f) => f > 0.0,
        }
    }

    /// Lossy conversion used for mixed comparisons.
    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Int(n) => n as f64,
            Quantity::Float(f) => f,
        }
    }

    /// Extracts a finite quantity from an untyped JSON value.
    pub fn from_value(value: &Value) -> Option<Quantity> {
        let Value::Number(number) = value else {
            return None;
        };
        let quantity = match number.as_i64() {
            Some(n) => Quantity::Int(n),
            None => Quantity::Float(number.as_f64()?),
        };
        quantity.is_finite().then_some(quantity)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ZERO
    }
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Quantity::Int(n)
    }
}

impl From<i32> for Quantity {
    fn from(n: i32) -> Self {
        Quantity::Int(n.into())
    }
}

impl From<u32> for Quantity {
    fn from(n: u32) -> Self {
        Quantity::Int(n.into())
    }
}

impl From<f64> for Quantity {
    fn from(f: f64) -> Self {
        Quantity::Float(f)
    }
}

impl FromStr for Quantity {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Quantity::Int(n));
        }
        match s.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Quantity::Float(f)),
            _ => Err(InventoryError::InvalidQuantity(s.to_owned())),
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => Quantity::Int(a.saturating_add(b)),
            (a, b) => Quantity::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => Quantity::Int(a.saturating_sub(b)),
            (a, b) => Quantity::Float(a.as_f64() - b.as_f64()),
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Quantity) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Quantity) -> Option<Ordering> {
        match (self, other) {
            (Quantity::Int(a), Quantity::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Quantity::Int(n) => write!(f, "{n}"),
            // Keep a trailing ".0" so floats stay recognisable in reports.
            Quantity::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Quantity::Float(x) => write!(f, "{x}"),
        }
    }
}
