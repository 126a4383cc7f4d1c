//! Calendar arithmetic on local calendar dates.
//!
//! Dates are plain [`NaiveDate`]s: the local calendar day with the time
//! truncated to midnight. Instants are turned into local dates by the caller
//! (`DateTime::date_naive` after converting to the display time zone), so
//! nothing in here depends on the machine's time zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use derive_more::Display;

use crate::provider::{Error, ErrorKind, Result};

/// Number of cells in a month grid, six weeks of seven days.
pub const GRID_DAYS: usize = 42;

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Canonical `YYYY-MM-DD` key of a local calendar day.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct DayKey(String);

impl DayKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shifts `date` by `n` days. Saturates at the representable range.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(n))
        .unwrap_or(if n < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    add_days(date, -(date.day0() as i64))
}

/// The Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    add_days(date, -(date.weekday().num_days_from_sunday() as i64))
}

/// First day of the month `delta` months away from `date`'s month.
///
/// The day of month is not preserved.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + delta;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or_else(|| start_of_month(date))
}

pub fn is_same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Key of the calendar day `date` falls on, in `date`'s own time zone.
pub fn format_date_key<D: Datelike>(date: &D) -> DayKey {
    DayKey(format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

/// The 42 consecutive days shown for `date`'s month, starting on a Sunday.
pub fn month_grid(date: NaiveDate) -> Vec<NaiveDate> {
    let first = start_of_week(start_of_month(date));
    (0..GRID_DAYS as i64).map(|i| add_days(first, i)).collect()
}

pub fn hours_since_midnight<T: Timelike>(time: &T) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0
}

/// Parses an ISO-8601 date-time.
///
/// Strings carrying an offset are absolute. Strings without one are read as
/// wall-clock time in `tz`.
pub fn parse_instant<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::TimeParse,
                &format!("'{}' is not a valid date and time", s),
            )
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::TimeParse,
                &format!("'{}' does not exist in the local time zone", s),
            )
        })
}
