//! Local calendar day source
//!
//! Day boundaries are local midnight, not UTC. Everything downstream works on
//! `NaiveDate`, so the time of day never reaches the selection logic.

use chrono::{Days, Local, NaiveDate};
use std::sync::RwLock;

/// Supplies "today" as a local calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the process's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable clock for tests and for replaying a given day.
#[derive(Debug)]
pub struct FixedClock {
    day: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day: RwLock::new(day) }
    }

    pub fn set(&self, day: NaiveDate) {
        match self.day.write() {
            Ok(mut guard) => *guard = day,
            Err(poisoned) => *poisoned.into_inner() = day,
        }
    }

    /// Move forward by whole days (rollover simulation).
    pub fn advance_days(&self, days: u64) {
        let next = self.today().checked_add_days(Days::new(days));
        if let Some(next) = next {
            self.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.day.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
