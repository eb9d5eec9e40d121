use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use stocks_core::Timestamp;
use stocks_ports::{Clock, ControllableClock};

/// Simulation clock for tests and demos
///
/// The clock either follows the wall clock from a movable reference point or
/// stays frozen until moved explicitly with [`ControllableClock::advance`] or
/// [`ControllableClock::set_time`].
///
/// Clones share state, so a test can keep one handle while the exchange owns
/// another.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    inner: Arc<RwLock<ClockState>>,
}

#[derive(Debug)]
struct ClockState {
    /// The reference point in simulated time
    simulated_time: DateTime<Utc>,
    /// The wall clock time when the reference point was last moved
    wall_clock_reference: DateTime<Utc>,
    /// Frozen clocks only move on explicit calls
    frozen: bool,
}

impl SimulationClock {
    /// Create a clock that runs in real time from now
    pub fn new() -> Self {
        let now = Utc::now();
        SimulationClock {
            inner: Arc::new(RwLock::new(ClockState {
                simulated_time: now,
                wall_clock_reference: now,
                frozen: false,
            })),
        }
    }

    /// Create a frozen clock starting at a specific time
    pub fn at(time: DateTime<Utc>) -> Self {
        SimulationClock {
            inner: Arc::new(RwLock::new(ClockState {
                simulated_time: time,
                wall_clock_reference: Utc::now(),
                frozen: true,
            })),
        }
    }

    /// Create a frozen clock at the current time
    pub fn fixed() -> Self {
        Self::at(Utc::now())
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.read().frozen
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        let state = self.inner.read();

        if state.frozen {
            state.simulated_time
        } else {
            state.simulated_time + (Utc::now() - state.wall_clock_reference)
        }
    }

    fn name(&self) -> &str {
        "SimulationClock"
    }
}

impl ControllableClock for SimulationClock {
    fn advance(&self, duration: Duration) {
        let current = self.now();
        let mut state = self.inner.write();
        state.simulated_time = current + duration;
        state.wall_clock_reference = Utc::now();
    }

    fn set_time(&self, time: Timestamp) {
        let mut state = self.inner.write();
        state.simulated_time = time;
        state.wall_clock_reference = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_time_does_not_advance() {
        let clock = SimulationClock::fixed();
        let t1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let t2 = clock.now();
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_advance_time() {
        let clock = SimulationClock::fixed();
        let t1 = clock.now();
        clock.advance(Duration::minutes(6));
        let t2 = clock.now();
        assert_eq!((t2 - t1).num_minutes(), 6);
    }

    #[test]
    fn test_set_time() {
        let clock = SimulationClock::fixed();
        let target = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        clock.set_time(target);

        assert_eq!(clock.now(), target);
    }

    #[test]
    fn test_real_time_clock_moves() {
        let clock = SimulationClock::new();
        assert!(!clock.is_frozen());
        let t1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now() > t1);
    }

    #[test]
    fn test_clone_shares_state() {
        let clock1 = SimulationClock::fixed();
        let clock2 = clock1.clone();

        clock1.advance(Duration::seconds(100));

        assert_eq!(clock1.now(), clock2.now());
    }
}
