//! Matching Engine Service
//!
//! Order matching and settlement engine for the compute capacity
//! marketplace. Buyer-triggered and seller-triggered matching passes run
//! concurrently against the shared ledger; the settlement transaction keeps
//! them from double-consuming capacity or demand.
//!
//! **Key Invariants:**
//! - No oversell: matched quantity never exceeds cumulative supplied
//!   capacity; capacity never goes negative.
//! - At most one settlement per buy order.
//! - Every executed match satisfies `ask <= bid`, the offer's demand floor,
//!   and the capacity available before the match.
//! - Deterministic selection (price priority, earliest-created tie-break).

pub mod engine;
pub mod error;
pub mod policy;
pub mod settlement;

pub use engine::{BuyOrderSubmission, MatchingEngine, SellOfferSubmission};
pub use error::EngineError;
