//! Price and quantity types
//!
//! Prices are non-negative `rust_decimal` values for deterministic arithmetic
//! (no floating-point errors). Quantities (demand, capacity, token budgets)
//! are non-negative integers.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error constructing a numeric type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("Price must be non-negative, got {0}")]
    NegativePrice(Decimal),

    #[error("Not a valid decimal: {0}")]
    InvalidDecimal(String),
}

/// A non-negative price per unit of capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Create a price, rejecting negative values
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(NumericError::NegativePrice(value));
        }
        Ok(Self(value))
    }

    /// Create from a whole number of currency units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Check for zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Price {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|_| NumericError::InvalidDecimal(s.to_string()))?;
        Self::try_new(value)
    }
}

// Manual Deserialize so negative prices are rejected at the boundary.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Price::try_new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative integer quantity of capacity units
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    /// Zero quantity
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked subtraction, None on underflow
    pub fn checked_sub(self, other: Quantity) -> Option<Quantity> {
        self.0.checked_sub(other.0).map(Quantity)
    }

    /// Checked addition, None on overflow
    pub fn checked_add(self, other: Quantity) -> Option<Quantity> {
        self.0.checked_add(other.0).map(Quantity)
    }

    /// Apply a signed delta, None when the result would be negative
    /// or overflow
    pub fn checked_add_signed(self, delta: i64) -> Option<Quantity> {
        if delta >= 0 {
            self.0.checked_add(delta as u64).map(Quantity)
        } else {
            self.0.checked_sub(delta.unsigned_abs()).map(Quantity)
        }
    }

    /// Value of this quantity at a given price
    pub fn value_at(&self, price: Price) -> Decimal {
        Decimal::from(self.0) * price.as_decimal()
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
