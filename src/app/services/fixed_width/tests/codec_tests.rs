//! Tests for decoding and encoding positional lines

use super::super::codec::{EncodeContext, FieldSpec, FormatSpec, decode, encode, plan_layout};
use super::super::warnings::WarningLog;
use super::fields;

#[test]
fn test_decode_trims_and_omits_empty_slices() {
    let spec = FormatSpec::new().with("a", 4).with("b", 6).with("c", 6);
    let record = decode("  AB      1.5    ", &spec);

    assert_eq!(record.get("a").map(String::as_str), Some("AB"));
    assert_eq!(record.get("b"), None);
    assert_eq!(record.get("c").map(String::as_str), Some("1.5"));
}

#[test]
fn test_decode_short_line_drops_trailing_fields() {
    let spec = FormatSpec::new().with("a", 5).with("b", 6).with("c", 6);
    let record = decode("82057  12", &spec);

    assert_eq!(record.len(), 2);
    assert_eq!(record["a"], "82057");
    assert_eq!(record["b"], "12");
    assert!(!record.contains_key("c"));
}

#[test]
fn test_from_header_uses_token_spans() {
    let spec = FormatSpec::from_header("@DATE  SRAD  TMAX  TMIN  RAIN");
    let widths: Vec<(&str, usize)> = spec.fields().iter().map(|(n, w)| (n.as_str(), *w)).collect();
    assert_eq!(
        widths,
        vec![("date", 5), ("srad", 6), ("tmax", 6), ("tmin", 6), ("rain", 6)]
    );
    assert_eq!(spec.total_width(), 29);

    let record = decode("82057  11.2  28.3  15.1   0.0", &spec);
    assert_eq!(record["date"], "82057");
    assert_eq!(record["srad"], "11.2");
    assert_eq!(record["rain"], "0.0");
}

#[test]
fn test_from_header_with_separated_marker() {
    let spec = FormatSpec::from_header("@ INSI      LAT     LONG  ELEV");
    let widths: Vec<usize> = spec.fields().iter().map(|(_, w)| *w).collect();
    assert_eq!(widths, vec![6, 9, 9, 6]);
    assert_eq!(spec.names().collect::<Vec<_>>(), vec!["insi", "lat", "long", "elev"]);
}

#[test]
fn test_encode_justification_and_defaults() {
    let plan = vec![
        FieldSpec::text("name", 8),
        FieldSpec::number("value", 6),
        FieldSpec::number("missing", 6),
        FieldSpec::text("blank", 4).gap(1).with_default(""),
    ];
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);
    let line = encode(&fields(&[("name", "UFGA"), ("value", "1.5")]), &plan, &mut ctx);

    assert_eq!(line, "UFGA       1.5   -99     ");
    assert!(warnings.is_empty());
}

#[test]
fn test_encode_malformed_number_uses_default_with_warning() {
    let plan = vec![FieldSpec::number("plpop", 6)];
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);
    let line = encode(&fields(&[("plpop", "many")]), &plan, &mut ctx);

    assert_eq!(line, "   -99");
    assert_eq!(warnings.len(), 1);
    assert!(warnings.lines()[0].contains("[plpop]"));
}

#[test]
fn test_encode_dates() {
    let plan = vec![
        FieldSpec::date("date", 5),
        FieldSpec::relative_date("hdate", 6),
    ];
    let record = fields(&[("date", "19820226"), ("hdate", "19820601")]);
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings).with_reference_date(Some("19820226"));

    assert_eq!(encode(&record, &plan, &mut ctx), "82057    95");
}

#[test]
fn test_relative_date_without_reference_falls_back() {
    let plan = vec![FieldSpec::relative_date("hdate", 6)];
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);

    assert_eq!(encode(&fields(&[("hdate", "19820601")]), &plan, &mut ctx), "   -99");
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_round_trip_recovers_fitting_fields() {
    let plan = vec![
        FieldSpec::text("soil_id", 10).gap(1),
        FieldSpec::text("sl_source", 12).gap(2),
        FieldSpec::number("sldp", 5).gap(1),
        FieldSpec::number("salb", 5).gap(1),
        FieldSpec::text("soil_name", 20).gap(1),
    ];
    let record = fields(&[
        ("soil_id", "IBMZ910014"),
        ("sl_source", "SCS"),
        ("sldp", "180"),
        ("soil_name", "Millhopper Fine Sand"),
    ]);

    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);
    let line = encode(&record, &plan, &mut ctx);
    let decoded = decode(&line, &plan_layout(&plan));

    for (key, value) in &record {
        assert_eq!(decoded.get(key), Some(value), "field {}", key);
    }
    assert_eq!(decoded["salb"], "-99");
}

#[test]
fn test_oversized_text_is_truncated_with_warning() {
    let plan = vec![FieldSpec::text("sltx", 5)];
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);

    assert_eq!(encode(&fields(&[("sltx", "SANDYLOAM")]), &plan, &mut ctx), "SANDY");
    assert_eq!(warnings.lines(), &["! Warning: Oversized data : [sltx] SANDYLOAM".to_string()]);
}

#[test]
fn test_verbatim_fields_skip_width_checks() {
    let plan = vec![
        FieldSpec::verbatim("plma", 5).right().gap(1),
        FieldSpec::verbatim("pl_name", 0).gap(1),
        FieldSpec::verbatim("wst_id", 8).gap(1).with_default(""),
    ];
    let record = fields(&[("plma", "S"), ("pl_name", "Full season planting")]);
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);

    assert_eq!(
        encode(&record, &plan, &mut ctx),
        "     S Full season planting         "
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_day_of_year_drops_the_year() {
    let plan = vec![
        FieldSpec::day_of_year("adat", 5).gap(1),
        FieldSpec::day_of_year("mdat", 5).gap(1),
        FieldSpec::day_of_year("hdat", 5).gap(1),
    ];
    let record = fields(&[("adat", "19820311"), ("mdat", "1982-13-01")]);
    let mut warnings = WarningLog::new();
    let mut ctx = EncodeContext::new(&mut warnings);

    assert_eq!(encode(&record, &plan, &mut ctx), "   070   -99   -99");
    assert_eq!(warnings.len(), 1);
    assert!(warnings.lines()[0].contains("[mdat]"));
}
