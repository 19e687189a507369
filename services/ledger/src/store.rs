//! Store trait and error types
//!
//! The settlement transaction relies on the conditional update contract
//! here: `update_*` compares the caller's expected version against the
//! stored record and applies the write only on a match. Two concurrent
//! settlements racing for the same record cannot both win.

use async_trait::async_trait;
use thiserror::Error;
use types::buyer::BuyOrder;
use types::ids::{OfferId, OrderId};
use types::seller::SellOffer;

/// Storage-layer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {id}")]
    NotFound { id: String },

    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: u64, found: u64 },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Shared ledger for buy orders and sell offers
///
/// Reads return snapshots; the snapshot's `version` field is the token for
/// a later conditional update.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Fetch one buy order
    async fn get_buy_order(&self, id: OrderId) -> Result<Option<BuyOrder>, StoreError>;

    /// Fetch one sell offer
    async fn get_sell_offer(&self, id: OfferId) -> Result<Option<SellOffer>, StoreError>;

    /// Snapshot all buy orders (order unspecified)
    async fn list_buy_orders(&self) -> Result<Vec<BuyOrder>, StoreError>;

    /// Snapshot all sell offers (order unspecified)
    async fn list_sell_offers(&self) -> Result<Vec<SellOffer>, StoreError>;

    /// Insert a newly created buy order
    async fn insert_buy_order(&self, order: BuyOrder) -> Result<(), StoreError>;

    /// Insert a newly created sell offer
    async fn insert_sell_offer(&self, offer: SellOffer) -> Result<(), StoreError>;

    /// Conditionally replace a buy order
    ///
    /// Applies only if the stored version equals `expected_version`;
    /// otherwise returns `VersionConflict` and leaves the record untouched.
    async fn update_buy_order(
        &self,
        expected_version: u64,
        order: BuyOrder,
    ) -> Result<(), StoreError>;

    /// Conditionally replace a sell offer
    async fn update_sell_offer(
        &self,
        expected_version: u64,
        offer: SellOffer,
    ) -> Result<(), StoreError>;
}
