//! Simple Stocks Clock Infrastructure
//!
//! Provides time sources for production and tests:
//!
//! - [`SystemClock`]: wall-clock time, the default for an exchange
//! - [`SimulationClock`]: real-time or frozen time that can be advanced
//!   explicitly, for deterministic price-window tests
//!
//! ## Usage
//!
//! ```ignore
//! use stocks_clock::{ControllableClock, SimulationClock};
//! use chrono::Duration;
//!
//! let clock = SimulationClock::fixed();
//! clock.advance(Duration::minutes(6)); // Jump past the price window
//! ```

mod simulation;
mod system;

pub use simulation::SimulationClock;
pub use system::SystemClock;

// Re-export the clock ports for convenience
pub use stocks_ports::{Clock, ControllableClock};
