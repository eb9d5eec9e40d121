//! GBCE Runner - demonstration driver for the simple stocks exchange
//!
//! Exercises the exchange the way a small trading session would:
//!
//! - **Trade Feed**: random trades against the listed stocks
//! - **Market Report**: per-stock metrics and the all-share index
//!
//! ## Flow
//!
//! ```text
//! ExchangeConfig ──► Exchange ◄── TradeFeedSimulator (random trades)
//!                       │
//!                       ▼
//!                 MarketReport (price, yield, P/E, index)
//! ```

pub mod error;
pub mod report;
pub mod trade_feed;

// Re-export main types
pub use error::{Result, RunnerError};
pub use report::{MarketReport, StockReport};
pub use trade_feed::{TradeFeedConfig, TradeFeedSimulator, TradeRequest};
