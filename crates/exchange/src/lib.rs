//! Simple Stocks Exchange
//!
//! A single exchange that lists stocks, records their trades and derives
//! market metrics from the trade ledger.
//!
//! # Architecture
//!
//! - [`Exchange`]: owns the stock registry and the [`TradeLedger`] behind one
//!   lock, stamps trades with its [`Clock`] and computes the all-share index
//! - [`Stock`]: static attributes and dividend policy; reads its price through
//!   the exchange it is listed on
//! - [`ExchangeConfig`]: JSON description of an exchange and its listings
//!
//! # Example
//!
//! ```ignore
//! use stocks_exchange::{Exchange, Side, Stock};
//! use rust_decimal_macros::dec;
//!
//! let exchange = Exchange::new("GBCE");
//! let pop = exchange.list(Stock::common("POP", dec!(100), dec!(8))?)?;
//! pop.record_trade(dec!(10), Side::Buy, dec!(2))?;
//! println!("P/E: {}", pop.pe_ratio()?);
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod stock;

// Re-export main types for convenience
pub use config::{ConfigError, ExchangeConfig, StockConfig};
pub use error::{ExchangeError, Result};
pub use exchange::{DEFAULT_PRICE_WINDOW_MINUTES, Exchange};
pub use ledger::{TradeLedger, volume_weighted_price};
pub use stock::Stock;

// Re-export domain types from the shared kernel
pub use stocks_clock::{Clock, ControllableClock, SimulationClock, SystemClock};
pub use stocks_core::{Price, Quantity, Side, StockType, Symbol, Timestamp, Trade, TradeId};
