//! Matching policy
//!
//! Pure selection logic over ledger snapshots. Given one driving record, it
//! returns at most one eligible counterpart; "none" is a normal outcome.
//!
//! A match is all-or-nothing: the full demand of the buy order is consumed
//! against a single offer, so eligibility requires the offer's remaining
//! capacity to cover the entire demand.
//!
//! Selection is deterministic: lowest ask (buyer-driven) or highest bid
//! (seller-driven), tie-broken by smallest id. Ids are UUID v7, so the
//! tie-break picks the earliest-created counterpart.

use std::cmp::Reverse;
use types::buyer::BuyOrder;
use types::numeric::{Price, Quantity};
use types::seller::SellOffer;

/// Check whether an offer can fill a demand at a given bid
///
/// Requires `ask <= bid`, the offer's floor (if any) to be cleared, and
/// enough remaining capacity for the full demand.
pub fn offer_satisfies(offer: &SellOffer, bid: Price, demand: Quantity) -> bool {
    offer.ask <= bid && offer.accepts(demand) && offer.capacity >= demand
}

/// Buyer-driven selection: cheapest eligible offer for this order
pub fn best_offer_for<'a>(order: &BuyOrder, offers: &'a [SellOffer]) -> Option<&'a SellOffer> {
    if !order.is_open() {
        return None;
    }
    offers
        .iter()
        .filter(|offer| offer_satisfies(offer, order.bid, order.demand))
        .min_by_key(|offer| (offer.ask, offer.id))
}

/// Seller-driven selection: highest-bidding eligible open order
pub fn best_order_for<'a>(offer: &SellOffer, orders: &'a [BuyOrder]) -> Option<&'a BuyOrder> {
    orders
        .iter()
        .filter(|order| order.is_open() && offer_satisfies(offer, order.bid, order.demand))
        .min_by_key(|order| (Reverse(order.bid), order.id))
}
