//! Integration tests reading translated DSSAT files back into a dataset
//!
//! Files written by the output controller are rediscovered on disk, loaded
//! into an input bundle and decoded by the readers.

mod common;

use dssat_translator::app::models::FieldsExt;
use dssat_translator::app::services::fixed_width::YearPivot;
use dssat_translator::app::services::translation::{DssatInput, OutputController};
use dssat_translator::cli::input::{discover_input_files, load_bundle};
use dssat_translator::config::TranslatorConfig;
use tempfile::TempDir;

/// Write a dataset, then read the weather, soil and observed files back
///
/// Purpose: Validate that the readers accept what the writers produce
/// Benefit: Keeps the two directions of the fixed-width layouts in agreement
#[tokio::test]
async fn test_written_files_read_back() {
    let dir = TempDir::new().unwrap();
    OutputController::new(TranslatorConfig::default())
        .write(&common::dataset(), dir.path())
        .await
        .unwrap();

    let files = discover_input_files(dir.path()).unwrap();
    let kinds: Vec<&str> = files.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds.contains(&"W") && kinds.contains(&"S") && kinds.contains(&"A"));

    let bundle = load_bundle(files).await.unwrap();
    let dataset = DssatInput::new(YearPivot::default()).read(&bundle);

    assert_eq!(dataset.weathers.len(), 1);
    let station = &dataset.weathers[0];
    assert_eq!(station.station_id(), "UFGA");
    assert_eq!(station.fields.value("wst_lat"), Some("29.630"));
    assert_eq!(station.daily.len(), 2);
    assert_eq!(station.daily[1].value("w_date"), Some("19820102"));
    assert_eq!(station.daily[1].value("tmin"), Some("9.8"));

    assert_eq!(dataset.soils.len(), 1);
    let soil = &dataset.soils[0];
    assert_eq!(soil.soil_id(), "IBMZ910014");
    assert_eq!(soil.layers.len(), 2);
    assert_eq!(soil.layers[0].value("sllb"), Some("5"));
    assert_eq!(soil.layers[1].value("slll"), Some("0.025"));

    assert_eq!(dataset.experiments.len(), 2);
    let first = &dataset.experiments[0];
    assert_eq!(first.exname(), "UFGA8201_1");
    assert_eq!(first.crop_id(), Some("MAZ"));
    assert_eq!(first.observed.summary.value("hwam"), Some("8000"));
    assert_eq!(first.observed.summary.value("cwam"), Some("12000"));
    assert_eq!(
        dataset.experiments[1].observed.summary.value("hwam"),
        Some("9000")
    );
}
