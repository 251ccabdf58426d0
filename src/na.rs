//! Missing-value sentinels and the dense encodings of temporal values.
//!
//! Floats use `NaN`, strings the empty string, and temporal dtypes reserve the
//! minimum value of their storage integer. Integers and booleans have no
//! sentinel and are widened (see [`Dtype::na_dtype`](crate::Dtype::na_dtype)).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};

/// Missing date (days since the Unix epoch)
pub const NA_DATE: i32 = i32::MIN;

/// Missing datetime or timedelta (microseconds)
pub const NA_TIMESTAMP: i64 = i64::MIN;

/// Missing string
pub const NA_STRING: &str = "";

// NaiveDate::num_days_from_ce() of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[inline]
pub fn is_na_float(x: f64) -> bool {
    x.is_nan()
}

#[inline]
pub fn is_na_string(s: &str) -> bool {
    s == NA_STRING
}

#[inline]
pub fn is_na_date(days: i32) -> bool {
    days == NA_DATE
}

#[inline]
pub fn is_na_timestamp(micros: i64) -> bool {
    micros == NA_TIMESTAMP
}

/// Encode a date as days since 1970-01-01
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Decode days since 1970-01-01, `None` for the sentinel
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    if is_na_date(days) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Encode a datetime as microseconds since the Unix epoch
pub fn datetime_to_micros(datetime: NaiveDateTime) -> i64 {
    datetime.and_utc().timestamp_micros()
}

/// Decode microseconds since the Unix epoch, `None` for the sentinel
pub fn micros_to_datetime(micros: i64) -> Option<NaiveDateTime> {
    if is_na_timestamp(micros) {
        return None;
    }
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// Encode a duration as microseconds; durations too long to encode become missing
pub fn timedelta_to_micros(delta: TimeDelta) -> i64 {
    delta.num_microseconds().unwrap_or(NA_TIMESTAMP)
}

/// Decode a microsecond duration, `None` for the sentinel
pub fn micros_to_timedelta(micros: i64) -> Option<TimeDelta> {
    if is_na_timestamp(micros) {
        return None;
    }
    Some(TimeDelta::microseconds(micros))
}
