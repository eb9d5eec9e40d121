//! Trade Feed - random trades for a demo session
//!
//! Picks a random listed stock, a random side, and a quantity and price drawn
//! uniformly from the configured ranges, then records the trade through the
//! stock itself.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use stocks_core::{Quantity, Side, Symbol, Trade};
use stocks_exchange::Exchange;

use crate::error::{Result, RunnerError};

/// Configuration for random trade generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeFeedConfig {
    /// Smallest quantity traded (inclusive)
    pub min_quantity: u32,
    /// Largest quantity traded (inclusive)
    pub max_quantity: u32,
    /// Lowest trade price (inclusive)
    pub min_price: u32,
    /// Highest trade price (inclusive)
    pub max_price: u32,
}

impl Default for TradeFeedConfig {
    fn default() -> Self {
        Self {
            min_quantity: 1,
            max_quantity: 1000,
            min_price: 1,
            max_price: 1000,
        }
    }
}

impl TradeFeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_quantity > self.max_quantity {
            return Err(RunnerError::InvalidFeedConfig(format!(
                "quantity range {}..={} is empty",
                self.min_quantity, self.max_quantity
            )));
        }
        if self.min_price > self.max_price {
            return Err(RunnerError::InvalidFeedConfig(format!(
                "price range {}..={} is empty",
                self.min_price, self.max_price
            )));
        }
        Ok(())
    }
}

/// A trade to be recorded, before it reaches the exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub symbol: Symbol,
    pub quantity: Quantity,
    pub side: Side,
    pub price: Decimal,
}

/// Generates random trades against the stocks of an exchange
pub struct TradeFeedSimulator {
    config: TradeFeedConfig,
    /// Random generator, seedable for reproducible sessions
    rng: StdRng,
}

impl TradeFeedSimulator {
    /// Create a trade feed seeded from entropy
    pub fn new(config: TradeFeedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Create with a specific seed for reproducible sessions
    pub fn with_seed(config: TradeFeedConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &TradeFeedConfig {
        &self.config
    }

    /// Draw the next random trade for one of `symbols`
    pub fn next_request(&mut self, symbols: &[Symbol]) -> Option<TradeRequest> {
        if symbols.is_empty() {
            return None;
        }

        let symbol = symbols[self.rng.gen_range(0..symbols.len())].clone();
        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let quantity = self
            .rng
            .gen_range(self.config.min_quantity..=self.config.max_quantity);
        let price = self
            .rng
            .gen_range(self.config.min_price..=self.config.max_price);

        Some(TradeRequest {
            symbol,
            quantity: quantity.into(),
            side,
            price: price.into(),
        })
    }

    /// Record one random trade on `exchange`
    pub fn tick(&mut self, exchange: &Exchange) -> Result<Trade> {
        let stocks = exchange.stocks();
        let symbols: Vec<Symbol> = stocks
            .iter()
            .map(|stock| stock.symbol().to_string())
            .collect();

        let request = self
            .next_request(&symbols)
            .ok_or_else(|| RunnerError::NothingListed(exchange.name().to_string()))?;

        let stock = stocks
            .iter()
            .find(|stock| stock.symbol() == request.symbol)
            .ok_or_else(|| RunnerError::NothingListed(exchange.name().to_string()))?;

        let trade = stock.record_trade(request.quantity, request.side, request.price)?;
        debug!("Trade feed recorded {}", trade);
        Ok(trade)
    }

    /// Record `count` random trades on `exchange`
    pub fn run_ticks(&mut self, exchange: &Exchange, count: usize) -> Result<Vec<Trade>> {
        (0..count).map(|_| self.tick(exchange)).collect()
    }
}
