//! Daily selection: calendar date → catalog index
//!
//! index = days_since_epoch mod catalog_len, computed on local calendar dates.
//! The canonical epoch is January 1 of the date's own year, so catalog entry
//! `no = 1` is the January 1 word and the sequence restarts every year.

use chrono::{Datelike, NaiveDate};

use crate::error::ZenError;

/// Reference day from which offsets are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Epoch {
    /// January 1 of the year being selected for
    #[default]
    StartOfYear,
    /// A fixed anchor; dates before it produce negative offsets
    Fixed(NaiveDate),
}

impl Epoch {
    pub fn anchor_for(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Epoch::StartOfYear => NaiveDate::from_yo_opt(date.year(), 1).unwrap_or(date),
            Epoch::Fixed(anchor) => *anchor,
        }
    }

    /// Whole calendar days from the epoch to `date` (negative before it)
    pub fn days_since(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.anchor_for(date)).num_days()
    }
}

/// Wrap any offset into `[0, len)`.
///
/// Also the debug-navigation entry point: stepping past either end of the
/// catalog wraps around instead of clamping.
pub fn wrap_index(offset: i64, len: usize) -> Result<usize, ZenError> {
    if len == 0 {
        return Err(ZenError::InvalidArgument("catalog is empty"));
    }
    let len = i64::try_from(len).map_err(|_| ZenError::InvalidArgument("catalog too large"))?;
    // rem_euclid with a positive modulus is always in [0, len)
    Ok(offset.rem_euclid(len) as usize)
}

/// Index of the entry shown on `date` under the canonical epoch.
pub fn select_index(date: NaiveDate, len: usize) -> Result<usize, ZenError> {
    select_index_with(Epoch::default(), date, len)
}

pub fn select_index_with(epoch: Epoch, date: NaiveDate, len: usize) -> Result<usize, ZenError> {
    wrap_index(epoch.days_since(date), len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDateTime};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_entry_catalog_scenario() {
        let epoch_day = ymd(2025, 1, 1);
        let epoch = Epoch::Fixed(epoch_day);
        let at = |offset: i64| {
            let date = if offset >= 0 {
                epoch_day.checked_add_days(Days::new(offset as u64)).unwrap()
            } else {
                epoch_day.checked_sub_days(Days::new((-offset) as u64)).unwrap()
            };
            select_index_with(epoch, date, 3).unwrap()
        };

        assert_eq!(at(0), 0);
        assert_eq!(at(1), 1);
        assert_eq!(at(2), 2);
        assert_eq!(at(3), 0);
        assert_eq!(at(-1), 2);
    }

    #[test]
    fn test_start_of_year_epoch() {
        assert_eq!(select_index(ymd(2025, 1, 1), 366).unwrap(), 0);
        assert_eq!(select_index(ymd(2025, 2, 1), 366).unwrap(), 31);
        assert_eq!(select_index(ymd(2024, 12, 31), 366).unwrap(), 365);
        assert_eq!(select_index(ymd(2025, 12, 31), 366).unwrap(), 364);
    }

    #[test]
    fn test_time_of_day_does_not_matter() {
        let morning = NaiveDateTime::parse_from_str("2025-10-16 00:00:01", "%Y-%m-%d %H:%M:%S").unwrap();
        let night = NaiveDateTime::parse_from_str("2025-10-16 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            select_index(morning.date(), 17).unwrap(),
            select_index(night.date(), 17).unwrap()
        );
    }

    #[test]
    fn test_consecutive_days_step_by_one() {
        let n = 7;
        let mut date = ymd(2025, 3, 1);
        for _ in 0..40 {
            let next = date.succ_opt().unwrap();
            let a = select_index(date, n).unwrap();
            let b = select_index(next, n).unwrap();
            assert_eq!(b, (a + 1) % n);
            date = next;
        }
    }

    #[test]
    fn test_index_always_in_range() {
        let epoch = Epoch::Fixed(ymd(2000, 6, 15));
        for n in 1..12usize {
            let mut date = ymd(1999, 1, 1);
            while date < ymd(2001, 1, 1) {
                let idx = select_index_with(epoch, date, n).unwrap();
                assert!(idx < n);
                date = date.checked_add_days(Days::new(13)).unwrap();
            }
        }
    }

    #[test]
    fn test_empty_catalog_is_invalid_argument() {
        assert!(matches!(
            select_index(ymd(2025, 1, 1), 0),
            Err(ZenError::InvalidArgument(_))
        ));
        assert!(matches!(wrap_index(5, 0), Err(ZenError::InvalidArgument(_))));
    }

    #[test]
    fn test_wrap_index_debug_stepping() {
        assert_eq!(wrap_index(-1, 366).unwrap(), 365);
        assert_eq!(wrap_index(366, 366).unwrap(), 0);
        assert_eq!(wrap_index(-367, 366).unwrap(), 365);
    }
}
