//! Solar-term (二十四節気) lookup
//!
//! The table lists the approximate first day of each term, sorted by
//! `(month, day)`. A date belongs to the latest term that started on or before
//! it; dates before the first row belong to the last row (previous year's
//! winter term, wrapping over New Year).

use chrono::{Datelike, NaiveDate};

use crate::error::ZenError;
use crate::model::{SekkiDefinition, SekkiTable};

/// Active term for a month/day.
///
/// Picks the row with the greatest start on or before the date, else the row
/// with the greatest start overall. For a sorted table that is "the latest row
/// not after the date, else the last row"; ties go to the later row.
pub fn resolve(month: u32, day: u32, table: &SekkiTable) -> Result<&SekkiDefinition, ZenError> {
    let entries = table.entries();
    if entries.is_empty() {
        return Err(ZenError::NoData("sekki table is empty"));
    }

    let date_value = month * 100 + day;
    let started = entries
        .iter()
        .filter(|entry| entry.date_value() <= date_value)
        .max_by_key(|entry| entry.date_value());

    started
        .or_else(|| entries.iter().max_by_key(|entry| entry.date_value()))
        .ok_or(ZenError::NoData("sekki table is empty"))
}

pub fn resolve_date(date: NaiveDate, table: &SekkiTable) -> Result<&SekkiDefinition, ZenError> {
    resolve(date.month(), date.day(), table)
}
