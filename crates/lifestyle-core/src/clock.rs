//! Injectable time source.
//!
//! Scoring never reads wall-clock time directly. Callers hand a [`Clock`]
//! to the functions that need "now", so a whole rendering pass can be
//! pinned to a single instant and tests can fix time.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_never_moves() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), at);
    }

    #[test]
    fn borrowed_clock_delegates() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let clock = FixedClock::new(at);

        fn read(clock: impl Clock) -> DateTime<Utc> {
            clock.now()
        }
        assert_eq!(read(&clock), at);
    }
}
