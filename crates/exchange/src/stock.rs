use chrono::Duration;
use log::debug;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use stocks_core::{
    Price, Side, StockType, Symbol, Trade, ValidationError, non_negative, optional_non_negative,
};

use crate::error::{ExchangeError, Result};
use crate::exchange::Exchange;

/// A single stock, optionally listed on a single exchange
///
/// A stock never holds trades itself: it reads them through the exchange it
/// is listed on. The link to that exchange is a non-owning handle set once,
/// at listing time; an unlisted stock has no exchange at all.
#[derive(Debug)]
pub struct Stock {
    symbol: Symbol,
    stock_type: StockType,
    par_value: Decimal,
    last_dividend: RwLock<Decimal>,
    /// Fraction of par value paid to preferred stock
    fixed_dividend: Option<Decimal>,
    exchange: OnceLock<Weak<Exchange>>,
}

impl Stock {
    /// Create a validated stock
    ///
    /// Preferred stock must carry a fixed dividend. Par value and dividends
    /// must not be negative.
    pub fn new(
        symbol: impl Into<Symbol>,
        stock_type: StockType,
        par_value: impl Into<Decimal>,
        last_dividend: impl Into<Decimal>,
        fixed_dividend: Option<Decimal>,
    ) -> std::result::Result<Self, ValidationError> {
        let par_value = non_negative("par_value", Some(par_value))?;
        let last_dividend = non_negative("last_dividend", Some(last_dividend))?;
        let fixed_dividend = if stock_type.requires_fixed_dividend() {
            Some(non_negative("fixed_dividend", fixed_dividend)?)
        } else {
            optional_non_negative("fixed_dividend", fixed_dividend)?
        };

        Ok(Self {
            symbol: symbol.into(),
            stock_type,
            par_value,
            last_dividend: RwLock::new(last_dividend),
            fixed_dividend,
            exchange: OnceLock::new(),
        })
    }

    /// Create a common stock
    pub fn common(
        symbol: impl Into<Symbol>,
        par_value: impl Into<Decimal>,
        last_dividend: impl Into<Decimal>,
    ) -> std::result::Result<Self, ValidationError> {
        Self::new(symbol, StockType::Common, par_value, last_dividend, None)
    }

    /// Create a preferred stock paying `fixed_dividend` of its par value
    pub fn preferred(
        symbol: impl Into<Symbol>,
        par_value: impl Into<Decimal>,
        last_dividend: impl Into<Decimal>,
        fixed_dividend: impl Into<Decimal>,
    ) -> std::result::Result<Self, ValidationError> {
        Self::new(
            symbol,
            StockType::Preferred,
            par_value,
            last_dividend,
            Some(fixed_dividend.into()),
        )
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn stock_type(&self) -> StockType {
        self.stock_type
    }

    pub fn par_value(&self) -> Decimal {
        self.par_value
    }

    pub fn last_dividend(&self) -> Decimal {
        *self.last_dividend.read()
    }

    /// Declare a new last dividend
    pub fn set_last_dividend(
        &self,
        value: impl Into<Decimal>,
    ) -> std::result::Result<(), ValidationError> {
        let value = non_negative("last_dividend", Some(value))?;
        *self.last_dividend.write() = value;
        Ok(())
    }

    pub fn fixed_dividend(&self) -> Option<Decimal> {
        self.fixed_dividend
    }

    pub fn is_associated(&self) -> bool {
        self.exchange.get().is_some()
    }

    /// The exchange this stock is listed on
    pub fn exchange(&self) -> Result<Arc<Exchange>> {
        self.exchange
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| ExchangeError::Unassociated(self.symbol.clone()))
    }

    /// Link this stock to `exchange`; returns false if it is already linked
    pub(crate) fn associate(&self, exchange: Weak<Exchange>) -> bool {
        self.exchange.set(exchange).is_ok()
    }

    /// Record a trade of this stock on its exchange
    pub fn record_trade(
        &self,
        quantity: impl Into<Decimal>,
        side: Side,
        price: impl Into<Decimal>,
    ) -> Result<Trade> {
        self.exchange()?
            .record_trade(&self.symbol, quantity, side, price)
    }

    /// Volume-weighted price over the exchange's price window
    ///
    /// Falls back to the last trade's price when nothing traded within the
    /// window, and is `None` when the stock has never traded.
    pub fn price(&self) -> Result<Option<Price>> {
        let exchange = self.exchange()?;
        exchange.volume_weighted_price(&self.symbol, exchange.price_window())
    }

    /// Volume-weighted price over an explicit window
    pub fn price_over(&self, window: Duration) -> Result<Option<Price>> {
        self.exchange()?.volume_weighted_price(&self.symbol, window)
    }

    /// Dividend yield at the current price
    ///
    /// Common stock yields its last dividend; preferred stock yields its
    /// fixed dividend applied to par value.
    pub fn dividend_yield(&self) -> Result<Decimal> {
        let price = self.require_price("Dividend yield")?;

        let dividend = match self.stock_type {
            StockType::Common => self.last_dividend(),
            StockType::Preferred => self
                .fixed_dividend
                .unwrap_or_default()
                .checked_mul(self.par_value)
                .ok_or_else(|| overflow("Dividend yield", &self.symbol))?,
        };

        let dividend_yield = dividend
            .checked_div(price)
            .ok_or_else(|| overflow("Dividend yield", &self.symbol))?;
        debug!("{} dividend yield {} at price {}", self.symbol, dividend_yield, price);
        Ok(dividend_yield.normalize())
    }

    /// Price/earnings ratio, using the last dividend for every stock type
    pub fn pe_ratio(&self) -> Result<Decimal> {
        let last_dividend = self.last_dividend();
        if last_dividend.is_zero() {
            return Err(ExchangeError::InvalidOperation(format!(
                "P/E ratio cannot be calculated for {} because it has not distributed a dividend",
                self.symbol
            )));
        }

        let price = self.price()?.ok_or_else(|| {
            ExchangeError::InvalidOperation(format!(
                "P/E ratio cannot be calculated for {} because it has no price",
                self.symbol
            ))
        })?;

        price
            .checked_div(last_dividend)
            .map(|ratio| ratio.normalize())
            .ok_or_else(|| overflow("P/E ratio", &self.symbol))
    }

    /// Current price, which must exist and be non-zero to divide by
    fn require_price(&self, metric: &str) -> Result<Price> {
        match self.price()? {
            Some(price) if !price.is_zero() => Ok(price),
            _ => Err(ExchangeError::InvalidOperation(format!(
                "{} for {} cannot be calculated because it has no price",
                metric, self.symbol
            ))),
        }
    }
}

fn overflow(metric: &str, symbol: &str) -> ExchangeError {
    ExchangeError::InvalidOperation(format!(
        "{} for {} is outside the decimal range",
        metric, symbol
    ))
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, par {}, last dividend {}",
            self.symbol,
            self.stock_type,
            self.par_value,
            self.last_dividend()
        )?;
        if let Some(fixed_dividend) = self.fixed_dividend {
            write!(f, ", fixed dividend {}", fixed_dividend)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_stock() {
        let stock = Stock::common("TEST", 100, 0).unwrap();
        assert_eq!(stock.symbol(), "TEST");
        assert_eq!(stock.stock_type(), StockType::Common);
        assert_eq!(stock.par_value(), dec!(100));
        assert_eq!(stock.last_dividend(), Decimal::ZERO);
        assert_eq!(stock.fixed_dividend(), None);

        let stock = Stock::preferred("TEST", 100, 1, dec!(0.02)).unwrap();
        assert_eq!(stock.fixed_dividend(), Some(dec!(0.02)));
    }

    #[test]
    fn test_preferred_requires_fixed_dividend() {
        let err = Stock::new("GIN", StockType::Preferred, 100, 8, None).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
        assert_eq!(err.field(), "fixed_dividend");
    }

    #[test]
    fn test_common_may_carry_fixed_dividend() {
        let stock = Stock::new("POP", StockType::Common, 100, 8, Some(dec!(0.01))).unwrap();
        assert_eq!(stock.fixed_dividend(), Some(dec!(0.01)));
    }

    #[test]
    fn test_rejects_negative_values() {
        assert_eq!(Stock::common("TEST", -5, 0).unwrap_err().field(), "par_value");
        assert_eq!(
            Stock::common("TEST", 100, -1).unwrap_err().field(),
            "last_dividend"
        );
        assert_eq!(
            Stock::preferred("TEST", 100, 0, dec!(-0.02))
                .unwrap_err()
                .field(),
            "fixed_dividend"
        );
    }

    #[test]
    fn test_set_last_dividend_validates_first() {
        let stock = Stock::common("TEST", 100, 10).unwrap();

        assert!(stock.set_last_dividend(-3).is_err());
        assert_eq!(stock.last_dividend(), dec!(10));

        stock.set_last_dividend(dec!(12.5)).unwrap();
        assert_eq!(stock.last_dividend(), dec!(12.5));
    }

    #[test]
    fn test_unlisted_stock_has_no_exchange() {
        let stock = Stock::common("TEST", 100, 10).unwrap();

        assert!(!stock.is_associated());
        assert!(stock.exchange().unwrap_err().is_unassociated());

        let err = stock.record_trade(10, Side::Buy, 300).unwrap_err();
        assert!(err.is_unassociated());
        assert!(err.is_invalid_operation());
        assert!(stock.price().unwrap_err().is_unassociated());
    }

    #[test]
    fn test_price_over_window_beyond_time_range() {
        let exchange = Exchange::new("Test Exchange");
        let stock = exchange.list(Stock::common("TEST", 100, 10).unwrap()).unwrap();
        stock.record_trade(10, Side::Buy, 300).unwrap();

        let err = stock.price_over(Duration::days(100_000_000)).unwrap_err();
        assert!(err.is_invalid_operation());
        assert_eq!(stock.price_over(Duration::minutes(5)).unwrap(), Some(dec!(300)));
    }

    #[test]
    fn test_display() {
        let stock = Stock::preferred("GIN", 100, 8, dec!(0.02)).unwrap();
        assert_eq!(
            stock.to_string(),
            "GIN (preferred, par 100, last dividend 8, fixed dividend 0.02)"
        );
    }
}
