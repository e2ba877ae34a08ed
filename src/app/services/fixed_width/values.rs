//! Column value formatting for the encode direction
//!
//! Each formatter returns the text to place in a column, before justification.
//! Absent values become the column default; problems are recorded in the
//! file's [`WarningLog`] and never abort the write.

use super::dates::{days_after, to_doy};
use super::warnings::WarningLog;
use crate::app::models::{Fields, FieldsExt};

/// Numeric column value from a raw string
///
/// Values that fit are kept verbatim. Longer decimal values are rounded to the
/// widest precision that fits; values that still do not fit are passed through
/// with an oversized warning. Unparseable values fall back to `default`.
pub fn number_value(
    width: usize,
    value: Option<&str>,
    key: &str,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return default.to_string();
    };

    let number: f64 = match value.parse() {
        Ok(n) => n,
        Err(_) => {
            warnings.invalid_value(key, value);
            return default.to_string();
        }
    };

    if value.chars().count() <= width {
        return value.to_string();
    }

    let decimals = value.split_once('.').map(|(_, d)| d.len()).unwrap_or(0);
    for precision in (0..decimals).rev() {
        let candidate = format!("{:.*}", precision, number);
        if candidate.len() <= width {
            return candidate;
        }
    }

    warnings.oversized(key, value);
    value.to_string()
}

/// Numeric column value for `key` in `fields`
pub fn format_number(
    width: usize,
    fields: &Fields,
    key: &str,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    number_value(width, fields.value(key), key, default, warnings)
}

/// Text column value from a raw string, truncated to `width` with a warning
pub fn text_value(
    width: usize,
    value: Option<&str>,
    key: &str,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return default.to_string();
    };

    if value.chars().count() > width {
        warnings.oversized(key, value);
        return value.chars().take(width).collect();
    }
    value.to_string()
}

/// Text column value for `key` in `fields`
pub fn format_text(
    width: usize,
    fields: &Fields,
    key: &str,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    text_value(width, fields.value(key), key, default, warnings)
}

/// Date column (yyddd) for a yyyymmdd value
pub fn date_value(
    value: Option<&str>,
    key: &str,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return default.to_string();
    };
    match to_doy(value) {
        Some(doy) => doy,
        None => {
            warnings.invalid_value(key, value);
            default.to_string()
        }
    }
}

/// Date column (yyddd) for `key` in `fields`
pub fn format_date(
    fields: &Fields,
    key: &str,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    date_value(fields.value(key), key, default, warnings)
}

/// Days between `reference` and the yyyymmdd value of `key`
pub fn format_relative_date(
    fields: &Fields,
    key: &str,
    reference: Option<&str>,
    default: &str,
    warnings: &mut WarningLog,
) -> String {
    let Some(value) = fields.value(key) else {
        return default.to_string();
    };
    match reference.and_then(|r| days_after(r, value)) {
        Some(days) => days.to_string(),
        None => {
            warnings.invalid_value(key, value);
            default.to_string()
        }
    }
}
