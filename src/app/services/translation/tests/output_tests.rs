//! Tests for the output controller

use super::super::{DssatInput, InputBundle, OutputController};
use super::{full_bundle, observed_text, soil_text, weather_text};
use crate::app::models::Dataset;
use crate::app::services::fixed_width::YearPivot;
use crate::config::{DssatVersion, TranslatorConfig};
use crate::constants::file_kinds;
use std::path::PathBuf;
use tempfile::TempDir;

fn config() -> TranslatorConfig {
    TranslatorConfig::default().with_workers(4)
}

fn names(files: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = files
        .iter()
        .filter_map(|f| f.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_observed_experiments_produce_experiment_files() {
    let dir = TempDir::new().unwrap();
    let bundle = InputBundle::new().with_file(file_kinds::OBSERVED, "UFGA8201.MZA", observed_text());
    let dataset = DssatInput::new(YearPivot::default()).read(&bundle);

    let report = OutputController::new(config())
        .write(&dataset, dir.path())
        .await
        .unwrap();

    assert_eq!(
        names(&report.files),
        vec![
            "DSSBatch.v45",
            "DSSBatch.v46",
            "Run45.bat",
            "Run46.bat",
            "UFGA8201.MZA",
            "UFGA8201.MZX",
        ]
    );
    // time series and cultivar tasks have nothing to write
    assert_eq!(report.empty, 2);
    assert!(report.failed.is_empty());
    assert!(!report.cancelled);

    let observed = std::fs::read_to_string(dir.path().join("UFGA8201.MZA")).unwrap();
    assert!(observed.contains("*EXP.DATA (A): UFGA8201MZ N-FERTILIZER X IRRIGATION\r\n"));
    assert!(observed.contains("     2   071 13000  9000   131"));
}

#[tokio::test]
async fn test_standalone_soil_and_weather() {
    let dir = TempDir::new().unwrap();
    let bundle = InputBundle::new()
        .with_file(file_kinds::WEATHER, "UFGA8201.WTH", weather_text())
        .with_file(file_kinds::SOIL, "IB.SOL", soil_text());
    let dataset = DssatInput::default().read(&bundle);

    let report = OutputController::new(config().with_dssat_versions(vec![DssatVersion::V46]))
        .write(&dataset, dir.path())
        .await
        .unwrap();

    let written = names(&report.files);
    assert!(written.contains(&"IB.SOL".to_string()));
    assert!(written.contains(&"Run46.bat".to_string()));
    assert!(!written.contains(&"Run45.bat".to_string()));
    assert_eq!(written.iter().filter(|n| n.ends_with(".WTH")).count(), 1);
    // no experiments, so no batch file
    assert_eq!(report.empty, 1);

    let soil = std::fs::read_to_string(dir.path().join("IB.SOL")).unwrap();
    assert!(soil.contains("*IBMZ910014  SCS"));
}

#[tokio::test]
async fn test_full_bundle_round_trip_names() {
    let dir = TempDir::new().unwrap();
    let dataset = DssatInput::default().read(&full_bundle());

    let report = OutputController::new(config())
        .write(&dataset, dir.path())
        .await
        .unwrap();

    for file in &report.files {
        assert!(file.starts_with(dir.path()));
        assert!(file.exists());
    }
    // soils are only written for experiments that reference them
    assert!(!dir.path().join("IB.SOL").exists());
    assert!(dir.path().join("UFGA8201.MZX").exists());
}

#[tokio::test]
async fn test_empty_dataset_writes_run_files() {
    let dir = TempDir::new().unwrap();
    let report = OutputController::new(config())
        .write(&Dataset::default(), dir.path())
        .await
        .unwrap();

    assert_eq!(names(&report.files), vec!["Run45.bat", "Run46.bat"]);
    assert_eq!(report.empty, 2);
}

#[tokio::test]
async fn test_nested_output_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("a").join("b");

    let report = OutputController::new(config())
        .write(&Dataset::default(), &out)
        .await
        .unwrap();
    assert!(out.is_dir());
    assert_eq!(report.files.len(), 2);
}

#[tokio::test]
async fn test_unusable_output_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "not a directory").unwrap();

    let error = OutputController::new(config())
        .write(&Dataset::default(), &blocker.join("out"))
        .await
        .unwrap_err();
    assert!(error.is_io());
}
