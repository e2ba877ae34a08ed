//! Tests for the observed summary reader

use super::super::observed::ObservedReader;
use super::observed_file;
use crate::app::models::FieldsExt;
use crate::app::services::fixed_width::YearPivot;
use crate::app::services::lookup::CropCodes;

#[test]
fn test_one_experiment_per_treatment() {
    let crops = CropCodes::new();
    let text = observed_file();
    let experiments =
        ObservedReader::new(&crops, YearPivot::default()).read_all([("UFGA8201.MZA", text.as_str())]);

    assert_eq!(experiments.len(), 2);
    let first = &experiments[0];
    assert_eq!(first.exname(), "UFGA8201_1");
    assert_eq!(first.fields.value("crid"), Some("MAZ"));
    assert_eq!(first.fields.value("local_name"), Some("N-FERTILIZER X IRRIGATION"));
    assert_eq!(experiments[1].exname(), "UFGA8201_2");
}

#[test]
fn test_rows_merge_and_dates_convert() {
    let crops = CropCodes::new();
    let text = observed_file();
    let experiments =
        ObservedReader::new(&crops, YearPivot::default()).read_all([("UFGA8201.MZA", text.as_str())]);

    let summary = &experiments[0].observed.summary;
    assert_eq!(summary.value("hwam"), Some("8000"));
    assert_eq!(summary.value("mdat"), Some("19820510"));
    assert_eq!(summary.value("adat"), Some("19820311"));
    assert_eq!(summary.value("cwam"), Some("12000"));
    assert!(!summary.contains_key("trno_a"));

    let second = &experiments[1].observed.summary;
    assert_eq!(second.value("adat"), Some("-99"));
    assert_eq!(second.value("hwam"), Some("9000"));
}

#[test]
fn test_unknown_extension_keeps_file_stem() {
    let crops = CropCodes::new();
    let text = "@TRNO  HWAM\n     1  8000\n";
    let experiments =
        ObservedReader::new(&crops, YearPivot::default()).read_all([("trial.txt", text)]);

    assert_eq!(experiments.len(), 1);
    assert_eq!(experiments[0].exname(), "trial_1");
    assert_eq!(experiments[0].crop_id(), None);
}

#[test]
fn test_bare_days_resolve_against_observed_planting_date() {
    let crops = CropCodes::new();
    let text = [
        "*EXP.DATA (A): UFGA8201MZ N-FERTILIZER X IRRIGATION",
        "@TRNO  PDAT  ADAT",
        "     1 82057   070",
        "     2   -99   071",
        "@TRNO  MDAT",
        "     1   130",
    ]
    .join("\n");
    let experiments =
        ObservedReader::new(&crops, YearPivot::default()).read_all([("UFGA8201.MZA", text.as_str())]);

    let first = &experiments[0].observed.summary;
    assert_eq!(first.value("pdat"), Some("19820226"));
    assert_eq!(first.value("adat"), Some("19820311"));
    assert_eq!(first.value("mdat"), Some("19820510"));

    let second = &experiments[1].observed.summary;
    assert_eq!(second.value("adat"), Some("071"));
}
