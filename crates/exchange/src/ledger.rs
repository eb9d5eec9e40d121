//! Per-symbol trade ledger and the volume-weighted price over it.

use rust_decimal::Decimal;
use std::collections::HashMap;
use stocks_core::{Price, Symbol, Timestamp, Trade};

use crate::error::{ExchangeError, Result};

/// Trades recorded on an exchange, one chronological sequence per symbol
///
/// Insertion order is chronological order: trades are only ever appended,
/// never edited or removed.
#[derive(Debug, Default)]
pub struct TradeLedger {
    trades: HashMap<Symbol, Vec<Trade>>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an (empty) sequence exists for `symbol`
    pub fn open(&mut self, symbol: &str) {
        self.trades.entry(symbol.to_string()).or_default();
    }

    pub fn append(&mut self, trade: Trade) {
        self.trades
            .entry(trade.symbol().to_string())
            .or_default()
            .push(trade);
    }

    /// Trades for `symbol` in recording order (empty if none)
    pub fn trades(&self, symbol: &str) -> &[Trade] {
        self.trades.get(symbol).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn last_trade(&self, symbol: &str) -> Option<&Trade> {
        self.trades(symbol).last()
    }

    /// Total number of trades across all symbols
    pub fn len(&self) -> usize {
        self.trades.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Volume-weighted price of `symbol` over trades newer than `since`
    pub fn volume_weighted_price(&self, symbol: &str, since: Timestamp) -> Result<Option<Price>> {
        volume_weighted_price(self.trades(symbol), since)
    }
}

/// Volume-weighted average price of the trades strictly newer than `since`.
///
/// When no trade is newer than `since`, the most recent trade's price is
/// returned regardless of its age. Returns `None` only when `trades` is empty.
/// A selection whose total quantity is zero has no defined average and also
/// falls back to the most recent trade's price. Sums that leave the decimal
/// range are an `InvalidOperation`.
pub fn volume_weighted_price(trades: &[Trade], since: Timestamp) -> Result<Option<Price>> {
    let Some(last) = trades.last() else {
        return Ok(None);
    };

    let recent: Vec<&Trade> = trades
        .iter()
        .filter(|trade| trade.timestamp() > since)
        .collect();
    if recent.is_empty() {
        return Ok(Some(last.price()));
    }

    let (notional, volume) = recent
        .iter()
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(notional, volume), trade| {
            Some((
                notional.checked_add(trade.notional()?)?,
                volume.checked_add(trade.quantity())?,
            ))
        })
        .ok_or_else(|| {
            ExchangeError::InvalidOperation(format!(
                "Price for {} is outside the decimal range",
                last.symbol()
            ))
        })?;

    Ok(match notional.checked_div(volume) {
        Some(price) => Some(price.normalize()),
        None => recent.last().map(|trade| trade.price()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use stocks_core::Side;

    fn trade_at(quantity: Decimal, price: Decimal, timestamp: Timestamp) -> Trade {
        Trade::new("TEST", quantity, Side::Buy, price, timestamp).unwrap()
    }

    #[test]
    fn test_empty_ledger_has_no_price() {
        let ledger = TradeLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.volume_weighted_price("TEST", Utc::now()).unwrap(), None);
    }

    #[test]
    fn test_weighted_average_of_recent_trades() {
        let now = Utc::now();
        let since = now - Duration::minutes(5);
        let trades = vec![
            trade_at(dec!(10), dec!(2), now),
            trade_at(dec!(20), dec!(2), now),
            trade_at(dec!(30), dec!(3), now),
        ];

        assert_eq!(volume_weighted_price(&trades, since).unwrap(), Some(dec!(2.5)));
    }

    #[test]
    fn test_stale_trades_are_excluded() {
        let now = Utc::now();
        let since = now - Duration::minutes(5);
        let trades = vec![
            trade_at(dec!(1000), dec!(50), now - Duration::minutes(10)),
            trade_at(dec!(10), dec!(4), now),
        ];

        assert_eq!(volume_weighted_price(&trades, since).unwrap(), Some(dec!(4)));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let now = Utc::now();
        let since = now - Duration::minutes(5);
        let trades = vec![
            trade_at(dec!(10), dec!(1), since),
            trade_at(dec!(10), dec!(3), now),
        ];

        assert_eq!(volume_weighted_price(&trades, since).unwrap(), Some(dec!(3)));
    }

    #[test]
    fn test_falls_back_to_most_recent_stale_trade() {
        let now = Utc::now();
        let stale = now - Duration::minutes(6);
        let trades = vec![
            trade_at(dec!(10), dec!(2), stale),
            trade_at(dec!(20), dec!(2), stale),
            trade_at(dec!(30), dec!(3), stale),
        ];

        assert_eq!(
            volume_weighted_price(&trades, now - Duration::minutes(5)).unwrap(),
            Some(dec!(3))
        );
    }

    #[test]
    fn test_zero_volume_uses_most_recent_price() {
        let now = Utc::now();
        let trades = vec![
            trade_at(dec!(0), dec!(7), now),
            trade_at(dec!(0), dec!(9), now),
        ];

        assert_eq!(
            volume_weighted_price(&trades, now - Duration::minutes(5)).unwrap(),
            Some(dec!(9))
        );
    }

    #[test]
    fn test_notional_beyond_decimal_range_is_invalid_operation() {
        let now = Utc::now();
        let trades = vec![trade_at(
            dec!(100_000_000_000_000_000_000),
            dec!(10_000_000_000),
            now,
        )];

        let err = volume_weighted_price(&trades, now - Duration::minutes(5)).unwrap_err();
        assert!(err.is_invalid_operation());
        assert_eq!(
            err.to_string(),
            "Invalid operation: Price for TEST is outside the decimal range"
        );
    }

    #[test]
    fn test_volume_sum_beyond_decimal_range_is_invalid_operation() {
        let now = Utc::now();
        let trades = vec![
            trade_at(Decimal::MAX, dec!(0), now),
            trade_at(Decimal::MAX, dec!(0), now),
        ];

        let err = volume_weighted_price(&trades, now - Duration::minutes(5)).unwrap_err();
        assert!(err.is_invalid_operation());
    }

    #[test]
    fn test_ledger_keeps_sequences_per_symbol() {
        let now = Utc::now();
        let mut ledger = TradeLedger::new();
        ledger.open("TEA");
        ledger.append(Trade::new("POP", 1, Side::Sell, 5, now).unwrap());
        ledger.append(Trade::new("POP", 2, Side::Buy, 6, now).unwrap());

        assert!(ledger.trades("TEA").is_empty());
        assert_eq!(ledger.trades("POP").len(), 2);
        assert_eq!(ledger.last_trade("POP").unwrap().price(), dec!(6));
        assert_eq!(ledger.len(), 2);
    }
}
