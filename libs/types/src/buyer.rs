//! Buy order lifecycle types
//!
//! A buy order requests a quantity of capacity (`demand`) at a maximum
//! per-unit price (`bid`) and carries the prompt submitted for fulfillment.
//! The order moves through an explicit tagged state machine instead of
//! encoding its phase in sentinel field values:
//!
//! ```text
//! PENDING ──reserve──> RESERVED ──settle──> SETTLED { output }
//!    ^                    │
//!    └──────release───────┤
//!                         └───fail───> FAILED { reason }
//! ```
//!
//! `RESERVED` exists so a concurrent matching pass cannot re-select an order
//! whose fulfillment call is still in flight. `SETTLED` and `FAILED` are
//! terminal for matching: later additive updates are recorded but never make
//! the order eligible again, so a given order settles at most once.

use crate::errors::ValidationError;
use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Buy order status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail")]
pub enum OrderStatus {
    /// Awaiting a match
    #[serde(rename = "PENDING")]
    Pending,

    /// Matched; fulfillment call in flight
    #[serde(rename = "RESERVED")]
    Reserved,

    /// Fulfilled with generated output (terminal)
    #[serde(rename = "SETTLED")]
    Settled { output: String },

    /// Match was reserved but fulfillment failed (terminal)
    #[serde(rename = "FAILED")]
    Failed { reason: String },
}

impl OrderStatus {
    /// Check if status is terminal (the order will never match again)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Settled { .. } | OrderStatus::Failed { .. })
    }
}

/// Demand-side record requesting capacity at a maximum price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyOrder {
    pub id: OrderId,
    pub bid: Price,
    pub demand: Quantity,
    pub prompt: String,
    pub status: OrderStatus,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
    pub version: u64,    // Optimistic locking
}

impl BuyOrder {
    /// Create a new pending order from a first submission
    ///
    /// The demand delta is signed to match the update path, but a first
    /// submission must produce a strictly positive demand.
    pub fn create(
        bid: Price,
        demand_delta: i64,
        prompt: impl Into<String>,
        timestamp: i64,
    ) -> Result<Self, ValidationError> {
        if bid.is_zero() {
            return Err(ValidationError::ZeroBid);
        }
        let demand = Quantity::ZERO
            .checked_add_signed(demand_delta)
            .ok_or(ValidationError::NonPositiveDemand { attempted: demand_delta })?;
        if demand.is_zero() {
            return Err(ValidationError::NonPositiveDemand { attempted: demand_delta });
        }

        Ok(Self {
            id: OrderId::new(),
            bid,
            demand,
            prompt: prompt.into(),
            status: OrderStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        })
    }

    /// Apply a follow-up submission: demand is additive, bid and prompt are
    /// overwritten
    ///
    /// The id and status are untouched; updating a terminal order is
    /// accepted bookkeeping but does not re-arm matching eligibility.
    pub fn apply_update(
        &mut self,
        bid: Price,
        demand_delta: i64,
        prompt: impl Into<String>,
        timestamp: i64,
    ) -> Result<(), ValidationError> {
        if bid.is_zero() {
            return Err(ValidationError::ZeroBid);
        }
        let attempted = self
            .demand
            .as_u64()
            .try_into()
            .ok()
            .and_then(|d: i64| d.checked_add(demand_delta))
            .ok_or(ValidationError::DemandOverflow)?;
        let new_demand = self
            .demand
            .checked_add_signed(demand_delta)
            .ok_or(ValidationError::NonPositiveDemand { attempted })?;
        if new_demand.is_zero() {
            return Err(ValidationError::NonPositiveDemand { attempted });
        }

        self.demand = new_demand;
        self.bid = bid;
        self.prompt = prompt.into();
        self.updated_at = timestamp;
        self.version += 1;
        Ok(())
    }

    /// Check if the order is awaiting a match
    pub fn is_open(&self) -> bool {
        matches!(self.status, OrderStatus::Pending)
    }

    /// Reserve the order for an in-flight settlement
    ///
    /// # Panics
    /// Panics if the order is not pending; callers re-validate first.
    pub fn reserve(&mut self, timestamp: i64) {
        assert!(self.is_open(), "Cannot reserve a non-pending order");
        self.status = OrderStatus::Reserved;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Release a reservation back to pending (stale match, retry selection)
    ///
    /// # Panics
    /// Panics if the order is not reserved.
    pub fn release(&mut self, timestamp: i64) {
        assert!(
            matches!(self.status, OrderStatus::Reserved),
            "Cannot release a non-reserved order"
        );
        self.status = OrderStatus::Pending;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Finalize a reservation with generated output
    ///
    /// Demand and bid drop to zero: the full demand was consumed by the
    /// match.
    ///
    /// # Panics
    /// Panics if the order is not reserved.
    pub fn settle(&mut self, output: impl Into<String>, timestamp: i64) {
        assert!(
            matches!(self.status, OrderStatus::Reserved),
            "Cannot settle a non-reserved order"
        );
        self.status = OrderStatus::Settled { output: output.into() };
        self.demand = Quantity::ZERO;
        self.bid = Price::ZERO;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Finalize a reservation whose fulfillment call failed
    ///
    /// The reserved demand stays consumed: the seller's capacity decrement
    /// and balance credit are retained as the cost of the attempt.
    ///
    /// # Panics
    /// Panics if the order is not reserved.
    pub fn fail(&mut self, reason: impl Into<String>, timestamp: i64) {
        assert!(
            matches!(self.status, OrderStatus::Reserved),
            "Cannot fail a non-reserved order"
        );
        self.status = OrderStatus::Failed { reason: reason.into() };
        self.demand = Quantity::ZERO;
        self.bid = Price::ZERO;
        self.updated_at = timestamp;
        self.version += 1;
    }

    /// Generated output, if the order settled successfully
    pub fn output(&self) -> Option<&str> {
        match &self.status {
            OrderStatus::Settled { output } => Some(output),
            _ => None,
        }
    }
}
