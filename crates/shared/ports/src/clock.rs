use chrono::Duration;
use stocks_core::Timestamp;

/// Port for time abstraction
///
/// The exchange stamps trades and evaluates price windows through this
/// trait, which allows it to run against:
/// - Real system time for production
/// - Fixed, manually advanced time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}

/// A clock that can be controlled (for simulation and tests)
pub trait ControllableClock: Clock {
    /// Advance time by a duration
    fn advance(&self, duration: Duration);

    /// Set time to a specific value
    fn set_time(&self, time: Timestamp);
}
