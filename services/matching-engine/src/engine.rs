//! Matching loop and public engine API
//!
//! The engine is invoked from independent, concurrent request handlers.
//! Each submission runs its own matching pass over current ledger state:
//!
//! - Buyer-triggered: a single selection and settlement attempt. An
//!   unmatched order stays pending and waits for a future seller-triggered
//!   pass. The asymmetry is deliberate.
//! - Seller-triggered: selection and settlement repeat while the offer has
//!   capacity and an eligible order exists. Every iteration re-reads the
//!   ledger, so capacity and demand reflect earlier iterations and any
//!   concurrent passes.

use std::sync::Arc;

use fulfillment::FulfillmentProvider;
use ledger::{LedgerStore, StoreError};
use types::buyer::{BuyOrder, OrderStatus};
use types::ids::{OfferId, OrderId};
use types::numeric::{Price, Quantity};
use types::seller::{Quote, SellOffer};

use crate::error::EngineError;
use crate::policy;
use crate::settlement::{self, SettleError};

/// Buyer submission: create (`id: None`) or additively update an order
#[derive(Debug, Clone)]
pub struct BuyOrderSubmission {
    pub id: Option<OrderId>,
    pub bid: Price,
    /// Signed demand delta, added to existing demand
    pub demand: i64,
    pub prompt: String,
}

/// Seller submission: create (`id: None`) or additively update an offer
#[derive(Debug, Clone)]
pub struct SellOfferSubmission {
    pub id: Option<OfferId>,
    pub ask: Price,
    /// Signed capacity delta, added to existing capacity
    pub capacity: i64,
    /// Overwrites the floor only when supplied
    pub min_order_size: Option<Quantity>,
}

/// Order matching and settlement engine over a shared ledger
pub struct MatchingEngine {
    store: Arc<dyn LedgerStore>,
    provider: Arc<dyn FulfillmentProvider>,
}

fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

impl MatchingEngine {
    pub fn new(store: Arc<dyn LedgerStore>, provider: Arc<dyn FulfillmentProvider>) -> Self {
        Self { store, provider }
    }

    /// Create or additively update a buy order, then run one
    /// buyer-triggered matching attempt
    ///
    /// Returns the resulting (possibly unchanged) order record.
    pub async fn submit_buy_order(
        &self,
        submission: BuyOrderSubmission,
    ) -> Result<BuyOrder, EngineError> {
        let order_id = self.upsert_buy_order(&submission).await?;
        self.run_buyer_pass(order_id).await?;

        self.store
            .get_buy_order(order_id)
            .await?
            .ok_or(EngineError::BuyerNotFound(order_id))
    }

    /// Create or additively update a sell offer, then run seller-triggered
    /// matching to exhaustion
    ///
    /// Returns the resulting offer record.
    pub async fn submit_sell_offer(
        &self,
        submission: SellOfferSubmission,
    ) -> Result<SellOffer, EngineError> {
        let offer_id = self.upsert_sell_offer(&submission).await?;
        self.run_seller_pass(offer_id).await?;

        self.store
            .get_sell_offer(offer_id)
            .await?
            .ok_or(EngineError::SellerNotFound(offer_id))
    }

    /// Read-only buyer lookup, no matching side effects
    pub async fn get_buy_order(&self, id: OrderId) -> Result<BuyOrder, EngineError> {
        self.store
            .get_buy_order(id)
            .await?
            .ok_or(EngineError::BuyerNotFound(id))
    }

    /// Read-only quote listing, no matching side effects
    ///
    /// Quotes are ordered by offer creation for stable output.
    pub async fn list_quotes(&self) -> Result<Vec<Quote>, EngineError> {
        let mut offers = self.store.list_sell_offers().await?;
        offers.sort_by_key(|offer| offer.id);
        Ok(offers.iter().map(Quote::from).collect())
    }

    // -- upserts ----------------------------------------------------------

    async fn upsert_buy_order(
        &self,
        submission: &BuyOrderSubmission,
    ) -> Result<OrderId, EngineError> {
        match submission.id {
            None => {
                let order = BuyOrder::create(
                    submission.bid,
                    submission.demand,
                    submission.prompt.clone(),
                    now_nanos(),
                )?;
                let id = order.id;
                self.store.insert_buy_order(order).await?;
                Ok(id)
            }
            Some(id) => loop {
                let current = self
                    .store
                    .get_buy_order(id)
                    .await?
                    .ok_or(EngineError::BuyerNotFound(id))?;
                // An in-flight settlement owns the record; the update would
                // race its finalization.
                if matches!(current.status, OrderStatus::Reserved) {
                    return Err(EngineError::Busy(id));
                }

                let read_version = current.version;
                let mut updated = current;
                updated.apply_update(
                    submission.bid,
                    submission.demand,
                    submission.prompt.clone(),
                    now_nanos(),
                )?;
                match self.store.update_buy_order(read_version, updated).await {
                    Ok(()) => return Ok(id),
                    Err(StoreError::VersionConflict { .. }) => continue,
                    Err(e) => return Err(e.into()),
                }
            },
        }
    }

    async fn upsert_sell_offer(
        &self,
        submission: &SellOfferSubmission,
    ) -> Result<OfferId, EngineError> {
        match submission.id {
            None => {
                let offer = SellOffer::create(
                    submission.ask,
                    submission.capacity,
                    submission.min_order_size,
                    now_nanos(),
                )?;
                let id = offer.id;
                self.store.insert_sell_offer(offer).await?;
                Ok(id)
            }
            Some(id) => loop {
                let current = self
                    .store
                    .get_sell_offer(id)
                    .await?
                    .ok_or(EngineError::SellerNotFound(id))?;

                let read_version = current.version;
                let mut updated = current;
                updated.apply_update(
                    submission.ask,
                    submission.capacity,
                    submission.min_order_size,
                    now_nanos(),
                )?;
                match self.store.update_sell_offer(read_version, updated).await {
                    Ok(()) => return Ok(id),
                    Err(StoreError::VersionConflict { .. }) => continue,
                    Err(e) => return Err(e.into()),
                }
            },
        }
    }

    // -- matching passes --------------------------------------------------

    /// Single selection and settlement attempt for one order
    async fn run_buyer_pass(&self, order_id: OrderId) -> Result<(), EngineError> {
        let Some(order) = self.store.get_buy_order(order_id).await? else {
            return Ok(());
        };
        if !order.is_open() {
            return Ok(());
        }

        let offers = self.store.list_sell_offers().await?;
        let Some(offer) = policy::best_offer_for(&order, &offers) else {
            tracing::debug!(order = %order_id, "No eligible offer, order stays pending");
            return Ok(());
        };

        match settlement::settle(self.store.as_ref(), self.provider.as_ref(), order_id, offer.id)
            .await
        {
            // One attempt only: a stale match leaves the order for a future
            // seller-triggered pass.
            Ok(_) | Err(SettleError::Stale) => Ok(()),
            Err(SettleError::Store(e)) => Err(e.into()),
        }
    }

    /// Settle matches against one offer until capacity or candidates run out
    async fn run_seller_pass(&self, offer_id: OfferId) -> Result<(), EngineError> {
        loop {
            let Some(offer) = self.store.get_sell_offer(offer_id).await? else {
                return Ok(());
            };
            if offer.capacity.is_zero() {
                return Ok(());
            }

            let orders = self.store.list_buy_orders().await?;
            let Some(order) = policy::best_order_for(&offer, &orders) else {
                return Ok(());
            };

            match settlement::settle(
                self.store.as_ref(),
                self.provider.as_ref(),
                order.id,
                offer_id,
            )
            .await
            {
                // Provider failures finalize the order as FAILED inside the
                // transaction; either way the loop moves to the next
                // candidate.
                Ok(_) => continue,
                // The ledger moved under us; re-read and re-select.
                Err(SettleError::Stale) => continue,
                Err(SettleError::Store(e)) => return Err(e.into()),
            }
        }
    }
}
