//! Date conversions between the model's yyyymmdd form and DSSAT day-of-year forms
//!
//! DSSAT files carry dates as `yyddd` (two-digit year plus three-digit day of
//! year) or as a bare day offset from a reference date (days after planting).
//! Two-digit years are resolved with a fixed century pivot.

use crate::constants::{DEFAULT_YEAR_PIVOT, MODEL_DATE_FORMAT};
use chrono::{Datelike, Duration, NaiveDate};

/// Century pivot for two-digit years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPivot(u32);

impl Default for YearPivot {
    fn default() -> Self {
        Self(DEFAULT_YEAR_PIVOT)
    }
}

impl YearPivot {
    pub fn new(pivot: u32) -> Self {
        Self(pivot)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Full year for a two-digit year: `yy <= pivot` → 2000s, otherwise 1900s
    pub fn resolve(&self, yy: u32) -> i32 {
        if yy <= self.0 {
            2000 + yy as i32
        } else {
            1900 + yy as i32
        }
    }
}

/// Parse a model date (yyyymmdd)
pub fn parse_model_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(value, MODEL_DATE_FORMAT).ok()
}

/// Render a date in model form
pub fn format_model_date(date: NaiveDate) -> String {
    date.format(MODEL_DATE_FORMAT).to_string()
}

/// yyyymmdd → yyddd
pub fn to_doy(value: &str) -> Option<String> {
    let date = parse_model_date(value)?;
    Some(format!("{:02}{:03}", date.year().rem_euclid(100), date.ordinal()))
}

/// yyddd → yyyymmdd, resolving the century with `pivot`
///
/// Leading zeros of the year may have been dropped by a numeric column, so
/// anything from 4 to 5 digits is accepted and split as `yy * 1000 + ddd`.
pub fn from_doy(value: &str, pivot: YearPivot) -> Option<String> {
    let value = value.trim();
    if value.len() < 4 || value.len() > 5 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number: u32 = value.parse().ok()?;
    let year = pivot.resolve(number / 1000);
    NaiveDate::from_yo_opt(year, number % 1000).map(format_model_date)
}

/// Day-of-year value that may omit its year (`ddd`), resolved against a reference date
///
/// A bare day earlier in the year than the reference belongs to the following year.
pub fn resolve_doy(value: &str, reference: Option<&str>, pivot: YearPivot) -> Option<String> {
    let value = value.trim();
    if value.len() >= 4 {
        return from_doy(value, pivot);
    }
    let day: u32 = value.parse().ok()?;
    let reference = parse_model_date(reference?)?;
    let year = if day < reference.ordinal() {
        reference.year() + 1
    } else {
        reference.year()
    };
    NaiveDate::from_yo_opt(year, day).map(format_model_date)
}

/// Whole days from `reference` to `value`, both in model form
pub fn days_after(reference: &str, value: &str) -> Option<i64> {
    let reference = parse_model_date(reference)?;
    let date = parse_model_date(value)?;
    Some((date - reference).num_days())
}

/// `reference` shifted by an integral number of days (days after planting)
pub fn add_days(reference: &str, days: &str) -> Option<String> {
    let reference = parse_model_date(reference)?;
    let days: f64 = days.trim().parse().ok()?;
    if !days.is_finite() {
        return None;
    }
    reference
        .checked_add_signed(Duration::days(days.round() as i64))
        .map(format_model_date)
}
