//! Calendar-day arithmetic.
//!
//! Days are `NaiveDate` values throughout the engine. Their string form, the
//! day key, is always `YYYY-MM-DD`. Instants are bucketed into days in the
//! configured timezone; nothing here reads the clock except [`today_in`].

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Errors from parsing calendar-day keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The value is not a `YYYY-MM-DD` date.
    #[error("invalid day key {value:?}: expected YYYY-MM-DD")]
    InvalidDayKey { value: String },
}

/// Formats a day as a zero-padded `YYYY-MM-DD` key.
pub fn format_day_key(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` key.
pub fn parse_day_key(value: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value.trim(), DAY_KEY_FORMAT).map_err(|_| DateError::InvalidDayKey {
        value: value.to_string(),
    })
}

/// Shifts `day` by a signed number of days, saturating at the calendar bounds.
pub fn add_days(day: NaiveDate, days: i64) -> NaiveDate {
    let shift = Days::new(days.unsigned_abs());
    if days >= 0 {
        day.checked_add_days(shift).unwrap_or(NaiveDate::MAX)
    } else {
        day.checked_sub_days(shift).unwrap_or(NaiveDate::MIN)
    }
}

pub fn subtract_days(day: NaiveDate, days: i64) -> NaiveDate {
    add_days(day, days.saturating_neg())
}

/// Hours between two instants, floored at zero.
///
/// Events whose end precedes their start contribute no load.
#[allow(clippy::cast_precision_loss)]
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let ms = (end - start).num_milliseconds();
    (ms as f64 / 3_600_000.0).max(0.0)
}

/// The calendar day an instant falls on in `tz`.
pub fn day_of(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Wall-clock "today" in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    day_of(Utc::now(), tz)
}

/// Converts a local wall-clock time on `day` in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Returns
/// `None` for times skipped by a DST gap or invalid hour/minute values.
pub fn at_local_time(day: NaiveDate, hour: u32, minute: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Full English weekday name, e.g. "Tuesday".
pub fn weekday_name(day: NaiveDate) -> String {
    day.format("%A").to_string()
}
