//! Injected time source and local calendar-day helpers

use chrono::{DateTime, Local, NaiveDate};
use std::sync::Mutex;

/// Source of "now" in local time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar day
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Move the clock to a new instant
    pub fn set(&self, now: DateTime<Local>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, by: chrono::Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Local calendar day of a timestamp
pub fn local_day(ts: &DateTime<Local>) -> NaiveDate {
    ts.date_naive()
}

/// Whole calendar days from `earlier` to `later` (negative if reversed)
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).single().unwrap()
    }

    #[test]
    fn test_fixed_clock_set_and_advance() {
        let clock = FixedClock::new(at(2026, 10, 19, 8, 0));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        clock.advance(chrono::Duration::hours(20));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());

        clock.set(at(2026, 1, 2, 12, 0));
        assert_eq!(clock.now(), at(2026, 1, 2, 12, 0));
    }

    #[test]
    fn test_days_between_uses_calendar_days() {
        // 23:59 and 00:01 the next day are one calendar day apart
        let late = local_day(&at(2026, 10, 18, 23, 59));
        let early = local_day(&at(2026, 10, 19, 0, 1));
        assert_eq!(days_between(late, early), 1);
        assert_eq!(days_between(early, late), -1);
        assert_eq!(days_between(early, early), 0);
    }
}
