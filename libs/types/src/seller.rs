//! Sell offer types
//!
//! A sell offer posts capacity at a minimum per-unit price (`ask`) with an
//! optional floor on accepted demand. Capacity is decremented and balance
//! credited each time a match settles against the offer; the offer itself
//! has no terminal state and keeps matching while capacity remains.

use crate::errors::ValidationError;
use crate::ids::OfferId;
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supply-side record offering capacity at a minimum price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellOffer {
    pub id: OfferId,
    pub ask: Price,
    pub capacity: Quantity,
    /// Minimum demand this offer will accept; `None` means no floor
    pub min_order_size: Option<Quantity>,
    /// Accumulated revenue, monotonically non-decreasing
    pub balance: Decimal,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
    pub version: u64,    // Optimistic locking
}

impl SellOffer {
    /// Create a new offer from a first submission
    pub fn create(
        ask: Price,
        capacity_delta: i64,
        min_order_size: Option<Quantity>,
        timestamp: i64,
    ) -> Result<Self, ValidationError> {
        let capacity = Quantity::ZERO
            .checked_add_signed(capacity_delta)
            .ok_or(ValidationError::NegativeCapacity { attempted: capacity_delta })?;

        Ok(Self {
            id: OfferId::new(),
            ask,
            capacity,
            min_order_size,
            balance: Decimal::ZERO,
            created_at: timestamp,
            updated_at: timestamp,
            version: 0,
        })
    }

    /// Apply a follow-up submission: capacity is additive, ask is
    /// overwritten, and the floor is overwritten only when supplied
    pub fn apply_update(
        &mut self,
        ask: Price,
        capacity_delta: i64,
        min_order_size: Option<Quantity>,
        timestamp: i64,
    ) -> Result<(), ValidationError> {
        let attempted = self
            .capacity
            .as_u64()
            .try_into()
            .ok()
            .and_then(|c: i64| c.checked_add(capacity_delta))
            .ok_or(ValidationError::CapacityOverflow)?;
        let new_capacity = self
            .capacity
            .checked_add_signed(capacity_delta)
            .ok_or(ValidationError::NegativeCapacity { attempted })?;

        self.capacity = new_capacity;
        self.ask = ask;
        if min_order_size.is_some() {
            self.min_order_size = min_order_size;
        }
        self.updated_at = timestamp;
        self.version += 1;
        Ok(())
    }

    /// Check whether a demand quantity clears this offer's floor
    pub fn accepts(&self, demand: Quantity) -> bool {
        match self.min_order_size {
            Some(floor) => demand >= floor,
            None => true,
        }
    }

    /// Commit a match: decrement capacity and credit `demand × ask`
    ///
    /// # Panics
    /// Panics if capacity is insufficient; callers re-validate first.
    pub fn reserve(&mut self, demand: Quantity, timestamp: i64) {
        let remaining = self
            .capacity
            .checked_sub(demand)
            .expect("Reservation would exceed remaining capacity");
        self.capacity = remaining;
        self.balance += demand.value_at(self.ask);
        self.updated_at = timestamp;
        self.version += 1;
    }
}

/// Public projection of an offer for the quote listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ask: Price,
    pub capacity: Quantity,
    pub min_order_size: Option<Quantity>,
}

impl From<&SellOffer> for Quote {
    fn from(offer: &SellOffer) -> Self {
        Self {
            ask: offer.ask,
            capacity: offer.capacity,
            min_order_size: offer.min_order_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1708123456789000000;

    #[test]
    fn test_offer_creation() {
        let offer = SellOffer::create(Price::from_u64(2), 100, Some(Quantity::new(10)), TS).unwrap();
        assert_eq!(offer.capacity, Quantity::new(100));
        assert_eq!(offer.balance, Decimal::ZERO);
        assert_eq!(offer.version, 0);
    }

    #[test]
    fn test_offer_creation_rejects_negative_capacity() {
        let result = SellOffer::create(Price::from_u64(2), -1, None, TS);
        assert_eq!(
            result.unwrap_err(),
            ValidationError::NegativeCapacity { attempted: -1 }
        );
    }

    #[test]
    fn test_additive_update_preserves_floor() {
        let mut offer =
            SellOffer::create(Price::from_u64(2), 100, Some(Quantity::new(10)), TS).unwrap();
        let id = offer.id;

        offer.apply_update(Price::from_u64(3), 50, None, TS + 1).unwrap();
        assert_eq!(offer.capacity, Quantity::new(150));
        assert_eq!(offer.ask, Price::from_u64(3));
        assert_eq!(offer.min_order_size, Some(Quantity::new(10)), "floor kept when unset");
        assert_eq!(offer.id, id, "id must never change across updates");

        offer
            .apply_update(Price::from_u64(3), 0, Some(Quantity::new(5)), TS + 2)
            .unwrap();
        assert_eq!(offer.min_order_size, Some(Quantity::new(5)));
    }

    #[test]
    fn test_update_rejects_negative_result() {
        let mut offer = SellOffer::create(Price::from_u64(2), 100, None, TS).unwrap();
        let err = offer.apply_update(Price::from_u64(2), -101, None, TS + 1).unwrap_err();
        assert_eq!(err, ValidationError::NegativeCapacity { attempted: -1 });
        assert_eq!(offer.capacity, Quantity::new(100));
    }

    #[test]
    fn test_accepts_floor() {
        let offer = SellOffer::create(Price::from_u64(2), 100, Some(Quantity::new(10)), TS).unwrap();
        assert!(offer.accepts(Quantity::new(10)));
        assert!(!offer.accepts(Quantity::new(9)));

        let no_floor = SellOffer::create(Price::from_u64(2), 100, None, TS).unwrap();
        assert!(no_floor.accepts(Quantity::new(1)), "no floor accepts any demand");
    }

    #[test]
    fn test_reserve_decrements_and_credits() {
        let mut offer = SellOffer::create(Price::from_u64(2), 100, None, TS).unwrap();
        offer.reserve(Quantity::new(20), TS + 1);

        assert_eq!(offer.capacity, Quantity::new(80));
        assert_eq!(offer.balance, Decimal::from(40));
        assert_eq!(offer.version, 1);
    }

    #[test]
    #[should_panic(expected = "Reservation would exceed remaining capacity")]
    fn test_reserve_beyond_capacity_panics() {
        let mut offer = SellOffer::create(Price::from_u64(2), 10, None, TS).unwrap();
        offer.reserve(Quantity::new(11), TS + 1);
    }

    #[test]
    fn test_quote_projection() {
        let offer = SellOffer::create(Price::from_u64(2), 100, Some(Quantity::new(10)), TS).unwrap();
        let quote = Quote::from(&offer);
        assert_eq!(quote.ask, offer.ask);
        assert_eq!(quote.capacity, offer.capacity);
        assert_eq!(quote.min_order_size, offer.min_order_size);
    }
}
