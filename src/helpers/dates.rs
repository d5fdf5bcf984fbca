//! Date arithmetic for partitioned paths such as `input/2011/08/01`.
//!
//! Formats use chrono's strftime syntax (`%Y-%m-%d`, `%m/%y/%d`, ...). Dates
//! without a time of day are taken as midnight, and formats without a day of
//! month as the first of the month, so `%Y/%m` partitions work too.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt::Write;

/// Default format for [`add_days_iso`].
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Parse `value` with `format` at whatever granularity the format carries.
///
/// # Errors
///
/// Returns an error if `value` does not match `format`.
pub fn parse_date(value: &str, format: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, format) {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    // month granularity: pin the day to the 1st behind a separator no input uses.
    // A format that already has `%d` sets the day twice here, so a conflicting
    // or missing day still fails instead of silently becoming the 1st.
    NaiveDate::parse_from_str(&format!("{value}\u{1}01"), &format!("{format}\u{1}%d"))
        .map(|d| d.and_time(NaiveTime::MIN))
        .with_context(|| format!("parse date {value:?} with format {format:?}"))
}

/// Render `value` with `format`.
///
/// # Errors
///
/// Returns an error if `format` contains an invalid specifier.
pub fn format_date(value: &NaiveDateTime, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format))
        .map_err(|_| anyhow!("invalid date format {format:?}"))?;
    Ok(out)
}

/// Shift a date by `days` (negative goes back) and re-render it.
///
/// `add_days("2008-02-28", 1, "%Y-%m-%d", "%m/%y/%d")` is `"02/08/29"`; with
/// `days == 0` this only converts the format.
///
/// # Errors
///
/// Returns an error if the date cannot be parsed, the result is out of
/// range, or `output_format` is invalid.
pub fn add_days(date: &str, days: i32, input_format: &str, output_format: &str) -> Result<String> {
    let parsed = parse_date(date, input_format)?;
    let shifted = TimeDelta::try_days(i64::from(days))
        .and_then(|delta| parsed.checked_add_signed(delta))
        .ok_or_else(|| anyhow!("{date} shifted by {days} days is out of range"))?;
    format_date(&shifted, output_format)
}

/// [`add_days`] with [`ISO_DATE`] on both sides.
///
/// # Errors
///
/// Same as [`add_days`].
pub fn add_days_iso(date: &str, days: i32) -> Result<String> {
    add_days(date, days, ISO_DATE, ISO_DATE)
}

/// Re-render `date` from one format into another.
///
/// # Errors
///
/// Returns an error if the date does not match `from` or `to` is invalid.
pub fn convert_date(date: &str, from: &str, to: &str) -> Result<String> {
    format_date(&parse_date(date, from)?, to)
}

/// Whether `value` lies in `[start, end]`.
pub fn is_within<T: PartialOrd>(value: &T, start: &T, end: &T) -> bool {
    start <= value && value <= end
}
