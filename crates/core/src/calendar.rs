//! Calendar helpers for the daily and weekly stats buckets.
//!
//! Bucket keys already written to storage depend on these functions, so
//! their output must stay stable.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

/// `YYYY-MM-DD` key of the UTC calendar day containing `at`.
#[must_use]
pub fn day_key(at: DateTime<Utc>) -> String {
    format_day(at.date_naive())
}

#[must_use]
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` day key.
#[must_use]
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// ISO-8601 week number (1-53) of the UTC day containing `at`.
#[must_use]
pub fn week_key(at: DateTime<Utc>) -> u32 {
    iso_week(at.date_naive())
}

/// ISO-8601 week number of `date`.
///
/// Weeks start on Monday and week 1 holds the year's first Thursday. The date
/// is moved to the Thursday of its week; the week number is that Thursday's
/// day of year divided by seven, rounded up.
#[must_use]
pub fn iso_week(date: NaiveDate) -> u32 {
    let day_num = i64::from(date.weekday().number_from_monday());
    let thursday = date
        .checked_add_signed(Duration::days(4 - day_num))
        .unwrap_or(date);
    thursday.ordinal().div_ceil(7)
}

/// Monday and Sunday bounding ISO week `week` of ISO week-year `week_year`.
///
/// Returns `None` for a week the year does not have (e.g. week 53 of a
/// 52-week year).
#[must_use]
pub fn week_bounds(week_year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let monday = NaiveDate::from_isoywd_opt(week_year, week, Weekday::Mon)?;
    let sunday = NaiveDate::from_isoywd_opt(week_year, week, Weekday::Sun)?;
    Some((monday, sunday))
}
