//! Simple Stocks Ports
//!
//! Port definitions (traits) for the simple stocks exchange.
//! These define the boundaries between domain logic and infrastructure.

mod clock;

pub use clock::{Clock, ControllableClock};
