//! Clock abstraction
//!
//! Time-dependent operations (device-code expiry, revocation) take an
//! injected clock rather than reading system time directly, so expiry logic
//! is deterministic under test.

use chrono::{DateTime, TimeZone, Utc};

/// Source of "now" for expiry comparisons
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> DateTime<Utc>;
}

/// System clock backed by the real wall clock
///
/// This is the default clock for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock returning a constant instant, for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a fixed clock pinned to the given instant
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Creates a fixed clock from a Unix timestamp in seconds
    pub fn from_timestamp(secs: i64) -> Self {
        Self {
            instant: Utc.timestamp_opt(secs, 0).single().unwrap_or_default(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_constant() {
        let clock = FixedClock::from_timestamp(1_700_000_000);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
