//! Calendar range resolution.
//!
//! Every aggregation window is a half-open day-granular range `[start, end)`
//! derived from a period and a reference date. Ranges are computed fresh per
//! query and never persisted.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Aggregation granularity. Carries no data; drives range resolution only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    Week,
    Month,
    Year,
}

/// Inclusive start, exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterates every day `d` with `start <= d < end`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

/// Resolves the window containing `reference` for the given period.
///
/// `week_start` only affects the Week period; clients disagree on the
/// convention (Monday vs Sunday), so it is an explicit input rather than
/// a baked-in choice.
pub fn resolve_range(period: TimePeriod, reference: NaiveDate, week_start: Weekday) -> DateRange {
    match period {
        TimePeriod::Day => DateRange {
            start: reference,
            end: reference + Days::new(1),
        },
        TimePeriod::Week => {
            let offset = (reference.weekday().num_days_from_monday() + 7
                - week_start.num_days_from_monday())
                % 7;
            let start = reference - Days::new(u64::from(offset));
            DateRange {
                start,
                end: start + Days::new(7),
            }
        }
        TimePeriod::Month => {
            let start = reference - Days::new(u64::from(reference.day0()));
            DateRange {
                start,
                end: start + Months::new(1),
            }
        }
        TimePeriod::Year => {
            let start = reference - Days::new(u64::from(reference.ordinal0()));
            DateRange {
                start,
                end: start + Months::new(12),
            }
        }
    }
}

/// Moves the reference date by `delta` units of `period`.
///
/// Month and year steps clamp the day-of-month when the target month is
/// shorter (Jan 31 → Feb 29/28), matching calendar navigation in the UIs.
pub fn shift_reference(reference: NaiveDate, period: TimePeriod, delta: i32) -> NaiveDate {
    match period {
        TimePeriod::Day => add_days(reference, i64::from(delta)),
        TimePeriod::Week => add_days(reference, i64::from(delta) * 7),
        TimePeriod::Month => add_months(reference, delta),
        TimePeriod::Year => add_months(reference, delta.saturating_mul(12)),
    }
}

fn add_days(date: NaiveDate, delta: i64) -> NaiveDate {
    if delta >= 0 {
        date + Days::new(delta as u64)
    } else {
        date - Days::new(delta.unsigned_abs())
    }
}

fn add_months(date: NaiveDate, delta: i32) -> NaiveDate {
    if delta >= 0 {
        date + Months::new(delta as u32)
    } else {
        date - Months::new(delta.unsigned_abs())
    }
}
