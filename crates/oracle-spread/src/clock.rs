//! Time source for save timestamps and the daily gate.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, Local};

use crate::storage::lock;

/// Supplies the current local time.
pub trait Clock {
    /// The current instant, in the user's local offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<FixedOffset>>>,
}

impl FixedClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        *lock(&self.now) = now;
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = lock(&self.now);
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *lock(&self.now)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_shared_between_clones() {
        let start = DateTime::parse_from_rfc3339("2026-03-01T08:00:00+01:00").unwrap();
        let clock = FixedClock::new(start);
        let other = clock.clone();
        clock.advance(chrono::Duration::hours(2));
        assert_eq!(
            other.now(),
            DateTime::parse_from_rfc3339("2026-03-01T10:00:00+01:00").unwrap()
        );
    }

    #[test]
    fn system_clock_is_close_to_now() {
        let diff = SystemClock.now().to_utc() - chrono::Utc::now();
        assert!(diff.num_seconds().abs() < 5);
    }
}
