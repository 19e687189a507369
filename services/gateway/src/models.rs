//! Wire models for the public API
//!
//! Submissions carry `id: "new"` to create a record and an existing uuid to
//! update one. Responses expose the full ledger records; quantity updates on
//! the wire are signed deltas, matching the engine's submission types.

use matching_engine::{BuyOrderSubmission, SellOfferSubmission};
use serde::Deserialize;
use types::ids::{OfferId, OrderId};
use types::numeric::{Price, Quantity};
use uuid::Uuid;

use crate::error::AppError;

/// Create-record sentinel for the `id` field
const NEW_ID: &str = "new";

fn parse_id(raw: &str, kind: &str) -> Result<Option<Uuid>, AppError> {
    if raw == NEW_ID {
        return Ok(None);
    }
    raw.parse::<Uuid>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid {kind} ID: {raw}")))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBuyOrderRequest {
    pub id: String,
    pub bid: Price,
    /// Signed delta added to existing demand
    pub demand: i64,
    pub prompt: String,
}

impl SubmitBuyOrderRequest {
    pub fn into_submission(self) -> Result<BuyOrderSubmission, AppError> {
        Ok(BuyOrderSubmission {
            id: parse_id(&self.id, "buyer")?.map(OrderId::from_uuid),
            bid: self.bid,
            demand: self.demand,
            prompt: self.prompt,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitSellOfferRequest {
    pub id: String,
    pub ask: Price,
    /// Signed delta added to existing capacity
    pub capacity: i64,
    /// Overwrites the floor when present, left unchanged when omitted
    #[serde(default)]
    pub min_order_size: Option<Quantity>,
}

impl SubmitSellOfferRequest {
    pub fn into_submission(self) -> Result<SellOfferSubmission, AppError> {
        Ok(SellOfferSubmission {
            id: parse_id(&self.id, "seller")?.map(OfferId::from_uuid),
            ask: self.ask,
            capacity: self.capacity,
            min_order_size: self.min_order_size,
        })
    }
}
