//! Settlement transaction
//!
//! Applies one matched (buyer, seller) pair atomically relative to any
//! concurrent settlement touching either record:
//!
//! 1. Re-read both records and re-validate eligibility. A concurrent
//!    competitor may have consumed the capacity or the order since
//!    selection; that aborts with [`SettleError::Stale`] and no mutation.
//! 2. CAS the buyer `PENDING -> RESERVED`. This is the mutual-exclusion
//!    point: of two racing settlements for the same order, exactly one wins
//!    the version check.
//! 3. CAS-loop the seller: decrement capacity, credit balance. On a version
//!    conflict the seller is re-read and eligibility re-checked; if the
//!    capacity no longer covers the demand, the buyer reservation is
//!    released and the match reported stale.
//! 4. Invoke the fulfillment provider. No lock is held during the call; the
//!    `RESERVED` status keeps other passes off this order.
//! 5. Finalize `RESERVED -> SETTLED` on success, `RESERVED -> FAILED` on
//!    provider failure. The seller's capacity decrement and balance credit
//!    are retained either way: reserved capacity is not refunded when
//!    generation fails.

use ledger::{LedgerStore, StoreError};
use fulfillment::FulfillmentProvider;
use thiserror::Error;
use types::buyer::BuyOrder;
use types::ids::{OfferId, OrderId};

use crate::policy;

/// Settlement failures
///
/// `Stale` is internal: the matching loop re-selects or terminates, and the
/// caller never sees it as a fault. Provider failures are not errors at this
/// level; they finalize the order as `FAILED` and the transaction succeeds.
#[derive(Error, Debug)]
pub enum SettleError {
    #[error("Match went stale before settlement, retry selection")]
    Stale,

    #[error("Storage error during settlement: {0}")]
    Store(StoreError),
}

fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Settle one selected match, returning the finalized buyer record
pub async fn settle(
    store: &dyn LedgerStore,
    provider: &dyn FulfillmentProvider,
    order_id: OrderId,
    offer_id: OfferId,
) -> Result<BuyOrder, SettleError> {
    // Step 1: re-read and re-validate against current ledger state.
    let buyer = store
        .get_buy_order(order_id)
        .await
        .map_err(SettleError::Store)?
        .ok_or(SettleError::Stale)?;
    let seller = store
        .get_sell_offer(offer_id)
        .await
        .map_err(SettleError::Store)?
        .ok_or(SettleError::Stale)?;
    if !buyer.is_open() || !policy::offer_satisfies(&seller, buyer.bid, buyer.demand) {
        return Err(SettleError::Stale);
    }

    // Step 2: reserve the buyer. Losing this CAS means a competitor got
    // there first.
    let demand = buyer.demand;
    let read_version = buyer.version;
    let mut reserved = buyer;
    reserved.reserve(now_nanos());
    match store.update_buy_order(read_version, reserved.clone()).await {
        Ok(()) => {}
        Err(StoreError::VersionConflict { .. }) => return Err(SettleError::Stale),
        Err(e) => return Err(SettleError::Store(e)),
    }

    // Step 3: commit the seller side. Retried CAS; capacity is checked on
    // every attempt so it can never go negative.
    loop {
        let current = match store.get_sell_offer(offer_id).await {
            Ok(Some(offer)) => offer,
            Ok(None) => {
                release(store, &mut reserved).await?;
                return Err(SettleError::Stale);
            }
            Err(e) => {
                release(store, &mut reserved).await?;
                return Err(SettleError::Store(e));
            }
        };
        if !policy::offer_satisfies(&current, reserved.bid, demand) {
            release(store, &mut reserved).await?;
            return Err(SettleError::Stale);
        }

        let seller_version = current.version;
        let mut updated = current;
        updated.reserve(demand, now_nanos());
        match store.update_sell_offer(seller_version, updated).await {
            Ok(()) => break,
            Err(StoreError::VersionConflict { .. }) => continue,
            Err(e) => {
                release(store, &mut reserved).await?;
                return Err(SettleError::Store(e));
            }
        }
    }

    // Step 4: fulfillment call, no locks held.
    let generation = provider.generate(&reserved.prompt, demand.as_u64()).await;

    // Step 5: finalize. Either branch leaves the reservation, never a stuck
    // RESERVED order.
    let reserved_version = reserved.version;
    match generation {
        Ok(output) => {
            tracing::info!(order = %reserved.id, offer = %offer_id, quantity = %demand, "Match settled");
            reserved.settle(output, now_nanos());
        }
        Err(e) => {
            tracing::warn!(order = %reserved.id, offer = %offer_id, error = %e, "Fulfillment failed; reservation kept");
            reserved.fail(e.to_string(), now_nanos());
        }
    }
    store
        .update_buy_order(reserved_version, reserved.clone())
        .await
        .map_err(SettleError::Store)?;

    Ok(reserved)
}

/// Roll a reservation back to pending after a stale seller side
async fn release(store: &dyn LedgerStore, reserved: &mut BuyOrder) -> Result<(), SettleError> {
    let version = reserved.version;
    reserved.release(now_nanos());
    store
        .update_buy_order(version, reserved.clone())
        .await
        .map_err(SettleError::Store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fulfillment::ProviderError;
    use ledger::MemoryLedger;
    use rust_decimal::Decimal;
    use types::buyer::OrderStatus;
    use types::numeric::{Price, Quantity};
    use types::seller::SellOffer;

    const TS: i64 = 1708123456789000000;

    struct FixedProvider {
        response: Result<String, ProviderError>,
    }

    #[async_trait]
    impl FulfillmentProvider for FixedProvider {
        async fn generate(&self, _prompt: &str, _max_tokens: u64) -> Result<String, ProviderError> {
            self.response.clone()
        }
    }

    fn ok_provider() -> FixedProvider {
        FixedProvider { response: Ok("generated text".to_string()) }
    }

    fn failing_provider() -> FixedProvider {
        FixedProvider { response: Err(ProviderError::Timeout) }
    }

    async fn seed(store: &MemoryLedger) -> (OrderId, OfferId) {
        let order = BuyOrder::create(Price::from_u64(3), 20, "x", TS).unwrap();
        let offer =
            SellOffer::create(Price::from_u64(2), 100, Some(Quantity::new(10)), TS).unwrap();
        let ids = (order.id, offer.id);
        store.insert_buy_order(order).await.unwrap();
        store.insert_sell_offer(offer).await.unwrap();
        ids
    }

    #[tokio::test]
    async fn test_settle_success() {
        let store = MemoryLedger::new();
        let (order_id, offer_id) = seed(&store).await;

        let settled = settle(&store, &ok_provider(), order_id, offer_id).await.unwrap();
        assert_eq!(settled.output(), Some("generated text"));
        assert_eq!(settled.demand, Quantity::ZERO);
        assert_eq!(settled.bid, Price::ZERO);

        let offer = store.get_sell_offer(offer_id).await.unwrap().unwrap();
        assert_eq!(offer.capacity, Quantity::new(80));
        assert_eq!(offer.balance, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_settle_provider_failure_keeps_reservation() {
        let store = MemoryLedger::new();
        let (order_id, offer_id) = seed(&store).await;

        let failed = settle(&store, &failing_provider(), order_id, offer_id).await.unwrap();
        assert!(matches!(failed.status, OrderStatus::Failed { .. }));
        assert_eq!(failed.demand, Quantity::ZERO);

        // Capacity and balance reflect the reservation despite the failure.
        let offer = store.get_sell_offer(offer_id).await.unwrap().unwrap();
        assert_eq!(offer.capacity, Quantity::new(80));
        assert_eq!(offer.balance, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_settle_stale_when_order_already_taken() {
        let store = MemoryLedger::new();
        let (order_id, offer_id) = seed(&store).await;

        // First settlement consumes the order.
        settle(&store, &ok_provider(), order_id, offer_id).await.unwrap();
        let offer_before = store.get_sell_offer(offer_id).await.unwrap().unwrap();

        // A second attempt finds the order no longer pending; no mutation.
        let err = settle(&store, &ok_provider(), order_id, offer_id).await.unwrap_err();
        assert!(matches!(err, SettleError::Stale));
        let offer_after = store.get_sell_offer(offer_id).await.unwrap().unwrap();
        assert_eq!(offer_before, offer_after);
    }

    #[tokio::test]
    async fn test_settle_stale_when_capacity_consumed() {
        let store = MemoryLedger::new();
        let order = BuyOrder::create(Price::from_u64(3), 80, "x", TS).unwrap();
        let offer = SellOffer::create(Price::from_u64(2), 100, None, TS).unwrap();
        let (order_id, offer_id) = (order.id, offer.id);
        store.insert_buy_order(order).await.unwrap();
        store.insert_sell_offer(offer.clone()).await.unwrap();

        // A competing settlement drains most of the capacity first.
        let mut drained = offer;
        let version = drained.version;
        drained.reserve(Quantity::new(50), TS + 1);
        store.update_sell_offer(version, drained).await.unwrap();

        let err = settle(&store, &ok_provider(), order_id, offer_id).await.unwrap_err();
        assert!(matches!(err, SettleError::Stale));

        // The buyer was not left reserved.
        let buyer = store.get_buy_order(order_id).await.unwrap().unwrap();
        assert!(buyer.is_open());
        assert_eq!(buyer.demand, Quantity::new(80));
    }

    #[tokio::test]
    async fn test_settle_stale_on_price_mismatch() {
        let store = MemoryLedger::new();
        let order = BuyOrder::create(Price::from_u64(1), 20, "y", TS).unwrap();
        let offer = SellOffer::create(Price::from_u64(2), 100, None, TS).unwrap();
        let (order_id, offer_id) = (order.id, offer.id);
        store.insert_buy_order(order).await.unwrap();
        store.insert_sell_offer(offer).await.unwrap();

        let err = settle(&store, &ok_provider(), order_id, offer_id).await.unwrap_err();
        assert!(matches!(err, SettleError::Stale));

        let buyer = store.get_buy_order(order_id).await.unwrap().unwrap();
        assert_eq!(buyer.demand, Quantity::new(20), "no mutation on stale match");
    }

    #[tokio::test]
    async fn test_settle_unknown_ids_are_stale() {
        let store = MemoryLedger::new();
        let (_, offer_id) = seed(&store).await;

        let err = settle(&store, &ok_provider(), OrderId::new(), offer_id).await.unwrap_err();
        assert!(matches!(err, SettleError::Stale));
    }
}
