use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use stocks_core::{Price, Symbol};
use stocks_exchange::{Exchange, ExchangeError, Stock};

/// Metrics of one stock at report time
///
/// Metrics that are undefined for the stock (no price, no dividend) are
/// `None` rather than errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub symbol: Symbol,
    pub price: Option<Price>,
    pub dividend_yield: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
}

impl StockReport {
    pub fn capture(stock: &Stock) -> Result<Self, ExchangeError> {
        Ok(Self {
            symbol: stock.symbol().to_string(),
            price: stock.price()?,
            dividend_yield: not_applicable(stock.dividend_yield())?,
            pe_ratio: not_applicable(stock.pe_ratio())?,
        })
    }
}

/// Snapshot of every listed stock plus the all-share index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub exchange: String,
    pub stocks: Vec<StockReport>,
    pub all_share_index: Option<Decimal>,
}

impl MarketReport {
    pub fn capture(exchange: &Exchange) -> Result<Self, ExchangeError> {
        let stocks = exchange
            .stocks()
            .iter()
            .map(|stock| StockReport::capture(stock))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exchange: exchange.name().to_string(),
            stocks,
            all_share_index: exchange.all_share_index()?,
        })
    }

    pub fn stock(&self, symbol: &str) -> Option<&StockReport> {
        self.stocks.iter().find(|report| report.symbol == symbol)
    }
}

/// Undefined metrics become `None`; any other failure propagates
fn not_applicable(metric: Result<Decimal, ExchangeError>) -> Result<Option<Decimal>, ExchangeError> {
    match metric {
        Ok(value) => Ok(Some(value)),
        Err(ExchangeError::InvalidOperation(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

impl fmt::Display for MarketReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stock in &self.stocks {
            writeln!(f, "-----")?;
            writeln!(f, "{}", stock.symbol)?;
            if let Some(dividend_yield) = stock.dividend_yield {
                writeln!(f, "Dividend yield: {}", dividend_yield.round_dp(6))?;
            }
            if let Some(pe_ratio) = stock.pe_ratio {
                writeln!(f, "P/E Ratio: {}", pe_ratio.round_dp(6))?;
            }
            match stock.price {
                Some(price) => writeln!(f, "Price: {}", price.round_dp(6))?,
                None => writeln!(f, "Price: n/a")?,
            }
        }
        writeln!(f, "-----")?;
        match self.all_share_index {
            Some(index) => write!(f, "{} All-Share Index: {}", self.exchange, index.round_dp(6)),
            None => write!(f, "{} All-Share Index: n/a", self.exchange),
        }
    }
}
