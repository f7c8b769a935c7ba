//! # Domain Types
//!
//! Input and output records of the calculation engine.
//!
//! ## Lenient Numbers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The admin pages hand us whatever the form produced:                    │
//! │                                                                         │
//! │    { "quantity": "2", "unitPrice": 45000000, "costPrice": null }        │
//! │                                                                         │
//! │  Every numeric field goes through `number_from_value`:                 │
//! │    number          → as f64 (NaN / ±∞ → 0)                              │
//! │    numeric string  → parsed ("2" → 2.0, " 1.5 " → 1.5)                 │
//! │    anything else   → 0                                                  │
//! │                                                                         │
//! │  Deserializing a LineItem therefore never fails on field contents.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Lenient Number Helpers
// =============================================================================

/// Replaces NaN and infinities with zero.
#[inline]
pub fn sanitize(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Reads a number out of an untyped JSON value, defaulting to zero.
pub fn number_from_value(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    sanitize(n)
}

/// Reads `field` from a JSON record as a number (missing → 0).
pub fn number_field(record: &Value, field: &str) -> f64 {
    record.get(field).map(number_from_value).unwrap_or(0.0)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(number_from_value(&other)),
    })
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of a purchase order or sales invoice.
///
/// Transient: built per calculation call, never persisted by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Units ordered or sold.
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: f64,

    /// Price per unit used for the line total.
    #[serde(default, deserialize_with = "lenient_number")]
    pub unit_price: f64,

    /// Purchase cost per unit (profit reports).
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub cost_price: Option<f64>,

    /// Selling price per unit when it differs from `unit_price`.
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub sell_price: Option<f64>,
}

impl LineItem {
    /// Creates a line with a quantity and a unit price.
    pub fn new(quantity: f64, unit_price: f64) -> Self {
        LineItem {
            quantity,
            unit_price,
            cost_price: None,
            sell_price: None,
        }
    }

    /// Sets the purchase cost per unit.
    pub fn with_cost(mut self, cost_price: f64) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    /// Sets the selling price per unit.
    pub fn with_sell(mut self, sell_price: f64) -> Self {
        self.sell_price = Some(sell_price);
        self
    }

    /// Parses a single untyped record; malformed records become an all-zero line.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => LineItem::default(),
        }
    }

    /// Parses an untyped list of records.
    ///
    /// Anything that is not a JSON array (including `null`) yields an empty
    /// list, so `subtotal` over it is 0.
    pub fn list_from_value(value: &Value) -> Vec<LineItem> {
        match value {
            Value::Array(items) => items.iter().map(LineItem::from_value).collect(),
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived totals for an order or invoice.
///
/// ## Invariant
/// `total == subtotal + vat_amount - discount_amount`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    pub subtotal: f64,
    pub vat_amount: f64,
    pub discount_amount: f64,
    pub total: f64,
}

// =============================================================================
// Stock Item
// =============================================================================

/// An inventory record as used by stock valuation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockItem {
    /// Units on hand in the warehouse.
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: f64,

    /// Purchase cost per unit.
    #[serde(default, deserialize_with = "lenient_number")]
    pub cost_price: f64,

    /// Units reserved by open orders.
    #[serde(default, deserialize_with = "lenient_number")]
    pub reserved: f64,
}

impl StockItem {
    pub fn new(quantity: f64, cost_price: f64) -> Self {
        StockItem {
            quantity,
            cost_price,
            reserved: 0.0,
        }
    }
}

// =============================================================================
// Period
// =============================================================================

/// Bucket size for [`crate::stats::aggregate_by_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Period {
    /// `YYYY-MM-DD`
    #[default]
    Day,
    /// `YYYY-MM`
    Month,
    /// `YYYY`
    Year,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Month => write!(f, "month"),
            Period::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(CoreError::InvalidPeriod(other.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
