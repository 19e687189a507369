//! Error taxonomy shared across marketplace services
//!
//! Validation failures are rejected before any ledger mutation and carry a
//! descriptive reason for the caller.

use thiserror::Error;

/// Submission validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Bid must be greater than 0")]
    ZeroBid,

    #[error("Resulting demand must be greater than 0 (attempted: {attempted})")]
    NonPositiveDemand { attempted: i64 },

    #[error("Resulting capacity must not be negative (attempted: {attempted})")]
    NegativeCapacity { attempted: i64 },

    #[error("Demand delta overflows quantity range")]
    DemandOverflow,

    #[error("Capacity delta overflows quantity range")]
    CapacityOverflow,
}
