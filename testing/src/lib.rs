//! # Parkwise Testing
//!
//! Testing utilities and helpers for the Parkwise booking engine.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use parkwise_testing::{ReducerTest, assertions, test_clock};
//!
//! ReducerTest::new(WizardReducer::new())
//!     .with_env(test_environment(test_clock()))
//!     .given_state(WizardState::default())
//!     .when_action(WizardAction::Start { space })
//!     .then_state(|state| assert_eq!(state.step(), Some(WizardStep::DateTime)))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use parkwise_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use parkwise_testing::mocks::FixedClock;
    /// use parkwise_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2024-10-24 12:00:00 UTC)
    ///
    /// Bookings in the test suites start the following morning, so drafts
    /// created with this clock are always in the future.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::from_timestamp(1_729_771_200, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_default_clock_is_the_day_before_the_sample_booking() {
        assert_eq!(test_clock().now().to_rfc3339(), "2024-10-24T12:00:00+00:00");
    }
}
