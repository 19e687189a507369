//! Engine error taxonomy
//!
//! Validation and not-found errors are synchronous rejections with no
//! ledger mutation. Storage faults surface as transient errors. Stale-match
//! and provider failures never reach this type: they are absorbed inside
//! the settlement transaction.

use ledger::StoreError;
use thiserror::Error;
use types::errors::ValidationError;
use types::ids::{OfferId, OrderId};

/// Caller-visible engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Buyer ID not found: {0}")]
    BuyerNotFound(OrderId),

    #[error("Seller ID not found: {0}")]
    SellerNotFound(OfferId),

    #[error("Order {0} has a settlement in flight, retry")]
    Busy(OrderId),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_passthrough() {
        let err = EngineError::from(ValidationError::ZeroBid);
        assert_eq!(err.to_string(), "Bid must be greater than 0");
    }

    #[test]
    fn test_store_error_wrapping() {
        let err = EngineError::from(StoreError::VersionConflict { expected: 1, found: 2 });
        assert!(err.to_string().contains("Version conflict"));
    }
}
