//! Tests for column value formatting

use super::super::values::{format_date, format_text, number_value, text_value};
use super::super::warnings::WarningLog;
use super::fields;

#[test]
fn test_number_fits_unchanged() {
    let mut warnings = WarningLog::new();
    assert_eq!(number_value(5, Some("12.5"), "x", "-99", &mut warnings), "12.5");
    assert_eq!(number_value(5, None, "x", "-99", &mut warnings), "-99");
    assert_eq!(number_value(5, Some("  "), "x", "-99", &mut warnings), "-99");
    assert!(warnings.is_empty());
}

#[test]
fn test_number_reduces_decimals_to_fit() {
    let mut warnings = WarningLog::new();
    assert_eq!(number_value(5, Some("12.3456"), "x", "-99", &mut warnings), "12.35");
    assert_eq!(number_value(3, Some("12.3456"), "x", "-99", &mut warnings), "12");
    assert!(warnings.is_empty());
}

#[test]
fn test_number_too_wide_passes_through_with_warning() {
    let mut warnings = WarningLog::new();
    assert_eq!(number_value(3, Some("123456"), "sldp", "-99", &mut warnings), "123456");
    assert_eq!(warnings.lines(), &["! Warning: Oversized data : [sldp] 123456".to_string()]);
}

#[test]
fn test_text_default_and_truncation() {
    let mut warnings = WarningLog::new();
    assert_eq!(text_value(4, None, "k", "", &mut warnings), "");
    assert_eq!(text_value(4, Some("ABCDEF"), "k", "", &mut warnings), "ABCD");
    assert_eq!(warnings.len(), 1);

    let record = fields(&[("wst_id", "UFGA")]);
    assert_eq!(format_text(8, &record, "wst_id", "-99", &mut warnings), "UFGA");
}

#[test]
fn test_date_formatting() {
    let mut warnings = WarningLog::new();
    let record = fields(&[("pdate", "19820226"), ("bad", "Feb 26")]);

    assert_eq!(format_date(&record, "pdate", "-99", &mut warnings), "82057");
    assert_eq!(format_date(&record, "none", "-99", &mut warnings), "-99");
    assert!(warnings.is_empty());
    assert_eq!(format_date(&record, "bad", "-99", &mut warnings), "-99");
    assert_eq!(warnings.len(), 1);
}
