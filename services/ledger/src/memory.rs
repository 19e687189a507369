//! In-memory ledger implementation
//!
//! Backs each record family with a `tokio::sync::RwLock<HashMap>`. The
//! write lock makes each conditional update atomic: version check and
//! replacement happen under one guard, so concurrent writers serialize at
//! the record level with no interleaving window.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use types::buyer::BuyOrder;
use types::ids::{OfferId, OrderId};
use types::seller::SellOffer;

use crate::store::{LedgerStore, StoreError};

/// In-memory ledger store
#[derive(Debug, Default)]
pub struct MemoryLedger {
    buy_orders: RwLock<HashMap<OrderId, BuyOrder>>,
    sell_offers: RwLock<HashMap<OfferId, SellOffer>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn get_buy_order(&self, id: OrderId) -> Result<Option<BuyOrder>, StoreError> {
        Ok(self.buy_orders.read().await.get(&id).cloned())
    }

    async fn get_sell_offer(&self, id: OfferId) -> Result<Option<SellOffer>, StoreError> {
        Ok(self.sell_offers.read().await.get(&id).cloned())
    }

    async fn list_buy_orders(&self) -> Result<Vec<BuyOrder>, StoreError> {
        Ok(self.buy_orders.read().await.values().cloned().collect())
    }

    async fn list_sell_offers(&self) -> Result<Vec<SellOffer>, StoreError> {
        Ok(self.sell_offers.read().await.values().cloned().collect())
    }

    async fn insert_buy_order(&self, order: BuyOrder) -> Result<(), StoreError> {
        self.buy_orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn insert_sell_offer(&self, offer: SellOffer) -> Result<(), StoreError> {
        self.sell_offers.write().await.insert(offer.id, offer);
        Ok(())
    }

    async fn update_buy_order(
        &self,
        expected_version: u64,
        order: BuyOrder,
    ) -> Result<(), StoreError> {
        let mut orders = self.buy_orders.write().await;
        let current = orders
            .get(&order.id)
            .ok_or_else(|| StoreError::NotFound { id: order.id.to_string() })?;
        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                found: current.version,
            });
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn update_sell_offer(
        &self,
        expected_version: u64,
        offer: SellOffer,
    ) -> Result<(), StoreError> {
        let mut offers = self.sell_offers.write().await;
        let current = offers
            .get(&offer.id)
            .ok_or_else(|| StoreError::NotFound { id: offer.id.to_string() })?;
        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                found: current.version,
            });
        }
        offers.insert(offer.id, offer);
        Ok(())
    }
}
