use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::Side;
use crate::validation::{ValidationError, non_negative};
use crate::values::{Price, Quantity, Symbol, Timestamp};

/// Unique identifier for a trade
pub type TradeId = Uuid;

/// A single executed trade of a listed stock
///
/// Trades are immutable once recorded: fields are private and there are no
/// setters. Construction goes through [`Trade::new`], which validates every
/// field before building the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    id: TradeId,
    timestamp: Timestamp,
    symbol: Symbol,
    quantity: Quantity,
    side: Side,
    price: Price,
}

impl Trade {
    /// Create a validated trade stamped with `timestamp`
    pub fn new(
        symbol: impl Into<Symbol>,
        quantity: impl Into<Decimal>,
        side: Side,
        price: impl Into<Decimal>,
        timestamp: Timestamp,
    ) -> Result<Self, ValidationError> {
        let quantity = non_negative("quantity", Some(quantity))?;
        let price = non_negative("price", Some(price))?;

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp,
            symbol: symbol.into(),
            quantity,
            side,
            price,
        })
    }

    pub fn id(&self) -> TradeId {
        self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Returns the notional value of the trade (price * quantity), or `None`
    /// when it does not fit in a `Decimal`
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} x {} @ {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.symbol,
            self.side,
            self.quantity,
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_trade() {
        let now = Utc::now();
        let trade = Trade::new("TEA", 10, Side::Buy, dec!(300), now).unwrap();

        assert_eq!(trade.symbol(), "TEA");
        assert_eq!(trade.quantity(), dec!(10));
        assert_eq!(trade.side(), Side::Buy);
        assert_eq!(trade.price(), dec!(300));
        assert_eq!(trade.timestamp(), now);
        assert_eq!(trade.notional(), Some(dec!(3000)));
    }

    #[test]
    fn test_trade_ids_are_unique() {
        let now = Utc::now();
        let a = Trade::new("TEA", 1, Side::Buy, 1, now).unwrap();
        let b = Trade::new("TEA", 1, Side::Buy, 1, now).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_rejects_negative_fields() {
        let now = Utc::now();

        let err = Trade::new("TEA", -4, Side::Buy, 300, now).unwrap_err();
        assert_eq!(err.field(), "quantity");

        let err = Trade::new("TEA", 10, Side::Sell, -1, now).unwrap_err();
        assert_eq!(err.field(), "price");
    }
}
