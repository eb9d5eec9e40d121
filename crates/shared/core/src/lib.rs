//! Simple Stocks Core Domain
//!
//! Pure domain types for the simple stocks exchange.
//! This crate contains no I/O and no shared state, and is 100% unit testable.

pub mod entities;
pub mod validation;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Side, StockType, Trade, TradeId};
pub use validation::{ValidationError, non_negative, optional_non_negative, validate_member};
pub use values::{Price, Quantity, Symbol, Timestamp};
